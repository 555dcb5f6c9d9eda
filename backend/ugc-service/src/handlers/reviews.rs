/// Review handlers: detail view, per-film listing and review likes.
use actix_web::{web, HttpResponse};
use bearer_auth::UserId;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ReviewDetail, StatusMessage};

use super::{AppState, PageQuery, ScoreQuery};

/// Detailed review view: body, the author's film score and the review's own
/// like metrics. Responds with a JSON null body when the review is unknown.
pub async fn review_detail(
    state: web::Data<AppState>,
    review_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let review_id = review_id.into_inner();

    let Some(review) = state.reviews.reviews.get_by_id(review_id).await? else {
        return Ok(HttpResponse::Ok().json(serde_json::Value::Null));
    };

    // The author's rating of the reviewed film, if any.
    let film_score = state
        .films
        .likes
        .get(review.obj_id, review.user_id)
        .await?
        .map(|like| like.score);

    let rating = state.reviews.rating(review_id).await?;

    Ok(HttpResponse::Ok().json(ReviewDetail {
        review_id,
        title: review.title,
        text: review.text,
        film_score,
        film_id: review.obj_id,
        user_id: review.user_id,
        rating,
    }))
}

/// Reviews of a film with aggregated review-like ratings. Sortable by
/// `-avg` (average score) or `-sum` (total score) as well as `date`, `_id`
/// or `user_id`.
pub async fn list_for_film(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.page()?;
    let reviews = state
        .reviews
        .reviews
        .rated_by_film(film_id.into_inner(), page, &query.sort)
        .await?;

    Ok(HttpResponse::Ok().json(reviews))
}

/// Like or dislike a review. Scores are mutually replacing.
pub async fn add_like(
    state: web::Data<AppState>,
    review_id: web::Path<Uuid>,
    user_id: UserId,
    query: web::Query<ScoreQuery>,
) -> Result<HttpResponse> {
    let score = query.validated()?;
    state
        .reviews
        .likes
        .rate(review_id.into_inner(), user_id.0, score)
        .await?;

    Ok(HttpResponse::Created().json(StatusMessage::created()))
}

/// Remove the caller's like or dislike from a review.
pub async fn remove_like(
    state: web::Data<AppState>,
    review_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    state
        .reviews
        .likes
        .delete(review_id.into_inner(), user_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(StatusMessage::deleted()))
}
