/// Film handlers: aggregate view plus the caller's like and review.
use actix_web::{web, HttpResponse};
use bearer_auth::UserId;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{FilmAggregate, StatusMessage};
use crate::services::Page;

use super::{AppState, ScoreQuery};

const RECENT_REVIEWS: i64 = 10;
const MIN_REVIEW_TEXT_LEN: usize = 5;

/// Film aggregate view: rating metrics, recent reviews and the calling
/// user's bookmark.
pub async fn film_detail(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let film_id = film_id.into_inner();

    let rating = state.films.rating(film_id).await?;
    let recent_reviews = state
        .films
        .reviews
        .search(Some(film_id), None, Page::first(RECENT_REVIEWS), "-date")
        .await?;
    let bookmark = state.films.bookmarks.get(film_id, user_id.0).await?;

    Ok(HttpResponse::Ok().json(FilmAggregate {
        film_id,
        rating,
        recent_reviews,
        bookmark,
    }))
}

/// Rate a film. Re-rating replaces the previous score.
pub async fn add_like(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    user_id: UserId,
    query: web::Query<ScoreQuery>,
) -> Result<HttpResponse> {
    let score = query.validated()?;
    state
        .films
        .likes
        .rate(film_id.into_inner(), user_id.0, score)
        .await?;

    Ok(HttpResponse::Created().json(StatusMessage::created()))
}

/// Remove the caller's like or dislike from a film.
pub async fn remove_like(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    state
        .films
        .likes
        .delete(film_id.into_inner(), user_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(StatusMessage::deleted()))
}

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// Review a film. Re-reviewing replaces the previous review.
pub async fn add_review(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    user_id: UserId,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse> {
    if query.text.chars().count() < MIN_REVIEW_TEXT_LEN {
        return Err(AppError::ValidationError(format!(
            "review text must be at least {MIN_REVIEW_TEXT_LEN} characters"
        )));
    }

    state
        .films
        .reviews
        .create(film_id.into_inner(), user_id.0, &query.title, &query.text)
        .await?;

    Ok(HttpResponse::Created().json(StatusMessage::created()))
}

/// Remove the caller's review of a film.
pub async fn remove_review(
    state: web::Data<AppState>,
    film_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    state
        .films
        .reviews
        .delete(film_id.into_inner(), user_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(StatusMessage::deleted()))
}
