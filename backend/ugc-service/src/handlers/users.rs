/// User handlers: account view and bookmarks.
use actix_web::{web, HttpResponse};
use bearer_auth::UserId;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{StatusMessage, UserAccount};
use crate::services::Page;

use super::AppState;

const RECENT: i64 = 10;

/// The caller's own activity: recent likes, reviews and bookmarks.
pub async fn my_account(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user_id = user_id.0;

    let likes = state
        .films
        .likes
        .search(None, Some(user_id), Page::first(RECENT), "-date")
        .await?;
    let reviews = state
        .films
        .reviews
        .search(None, Some(user_id), Page::first(RECENT), "-date")
        .await?;
    let bookmarks = state
        .films
        .bookmarks
        .search(None, Some(user_id), Page::first(RECENT), "-date")
        .await?;

    Ok(HttpResponse::Ok().json(UserAccount {
        user_id,
        recent_likes: Some(likes),
        recent_reviews: reviews,
        bookmarks: Some(bookmarks),
    }))
}

/// Public minimal view of any user: recent reviews only.
pub async fn user_detail(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = user_id.into_inner();

    let reviews = state
        .films
        .reviews
        .search(None, Some(user_id), Page::first(RECENT), "-date")
        .await?;

    Ok(HttpResponse::Ok().json(UserAccount {
        user_id,
        recent_likes: None,
        recent_reviews: reviews,
        bookmarks: None,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TimestampQuery {
    /// Playback position; zero when the film has not been started
    #[serde(default)]
    pub timestamp: i64,
}

/// Bookmark a film. Re-bookmarking replaces the stored position.
pub async fn add_bookmark(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    user_id: UserId,
    query: web::Query<TimestampQuery>,
) -> Result<HttpResponse> {
    let film_id = film_id.into_inner();

    state
        .films
        .bookmarks
        .create(film_id, user_id.0, query.timestamp)
        .await?;
    debug!("bookmark added for film {}", film_id);

    if let Some(forwarder) = &state.log_forwarder {
        forwarder.forward_bookmark(film_id, user_id.0, query.timestamp);
    }

    Ok(HttpResponse::Created().json(StatusMessage::created()))
}

/// Remove the caller's bookmark for a film.
pub async fn remove_bookmark(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let film_id = film_id.into_inner();

    state.films.bookmarks.delete(film_id, user_id.0).await?;
    debug!("bookmark removed for film {}", film_id);

    Ok(HttpResponse::Ok().json(StatusMessage::deleted()))
}
