/// Public like listings.
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;

use super::{AppState, PageQuery};

/// All likes, paginated.
pub async fn list_all(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.page()?;
    let likes = state.films.likes.search(None, None, page, &query.sort).await?;

    Ok(HttpResponse::Ok().json(likes))
}

/// Likes for one film, paginated.
pub async fn list_for_film(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.page()?;
    let likes = state
        .films
        .likes
        .search(Some(film_id.into_inner()), None, page, &query.sort)
        .await?;

    Ok(HttpResponse::Ok().json(likes))
}
