/// HTTP handlers and route wiring for the UGC API
///
/// Routes live under `/api/v1`:
/// - `/films/*` - film aggregate view, likes and reviews (authenticated)
/// - `/likes/*` - public like listings
/// - `/reviews/*` - review detail and listings, review likes
/// - `/users/*` - account view and bookmarks
use std::sync::Arc;

use actix_web::{web, Scope};
use bearer_auth::{BearerAuthMiddleware, TokenVerifier};
use serde::Deserialize;

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::services::{
    AggregateService, BookmarkService, LikeService, LogForwarder, Page, ReviewService,
};

pub mod films;
pub mod likes;
pub mod reviews;
pub mod users;

/// Shared handler state: the film-side and review-side aggregate services.
///
/// Both sides share the review and bookmark services; they differ in which
/// collection their likes come from.
#[derive(Clone)]
pub struct AppState {
    pub films: AggregateService,
    pub reviews: AggregateService,
    pub log_forwarder: Option<LogForwarder>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let review_service = ReviewService::new(store.clone());
        let bookmarks = BookmarkService::new(store.clone());

        Self {
            films: AggregateService::new(
                LikeService::for_films(store.clone()),
                review_service.clone(),
                bookmarks.clone(),
            ),
            reviews: AggregateService::new(
                LikeService::for_reviews(store),
                review_service,
                bookmarks,
            ),
            log_forwarder: None,
        }
    }

    pub fn with_log_forwarder(mut self, forwarder: LogForwarder) -> Self {
        self.log_forwarder = Some(forwarder);
        self
    }
}

/// Pagination query parameters, bracketed aliases (`page[size]`,
/// `page[number]`) kept for API compatibility.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page_size", rename = "page[size]")]
    pub page_size: i64,
    #[serde(default = "default_page_number", rename = "page[number]")]
    pub page_number: i64,
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_page_size() -> i64 {
    10
}

fn default_page_number() -> i64 {
    1
}

fn default_sort() -> String {
    "_id".to_string()
}

impl PageQuery {
    /// Validate bounds (size 10..=100, number >= 1) and build a [`Page`].
    pub fn page(&self) -> Result<Page> {
        if !(10..=100).contains(&self.page_size) {
            return Err(AppError::ValidationError(
                "page[size] must be between 10 and 100".into(),
            ));
        }
        if self.page_number < 1 {
            return Err(AppError::ValidationError(
                "page[number] must be at least 1".into(),
            ));
        }
        Ok(Page {
            size: self.page_size,
            number: self.page_number,
        })
    }
}

/// Score query parameter shared by the like endpoints.
#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    #[serde(default = "default_score")]
    pub score: i32,
}

fn default_score() -> i32 {
    10
}

impl ScoreQuery {
    pub fn validated(&self) -> Result<i32> {
        if !(0..=10).contains(&self.score) {
            return Err(AppError::ValidationError(
                "score must be between 0 and 10".into(),
            ));
        }
        Ok(self.score)
    }
}

/// Build the `/api/v1` scope. Film, bookmark and review-like mutations sit
/// behind the bearer middleware; listings and detail views are public.
pub fn api_scope(verifier: Arc<TokenVerifier>) -> Scope {
    web::scope("/api/v1")
        .service(
            web::scope("/films")
                .wrap(BearerAuthMiddleware::new(verifier.clone()))
                .route("/{film_id}", web::get().to(films::film_detail))
                .route("/{film_id}/add_like", web::post().to(films::add_like))
                .route(
                    "/{film_id}/remove_like",
                    web::delete().to(films::remove_like),
                )
                .route("/{film_id}/add_review", web::post().to(films::add_review))
                .route(
                    "/{film_id}/remove_review",
                    web::delete().to(films::remove_review),
                ),
        )
        .service(
            web::scope("/likes")
                // Both with and without the trailing slash
                .route("", web::get().to(likes::list_all))
                .route("/", web::get().to(likes::list_all))
                .route("/{film_id}", web::get().to(likes::list_for_film)),
        )
        .service(
            web::scope("/reviews")
                .route("/film/{film_id}", web::get().to(reviews::list_for_film))
                .service(
                    web::resource("/{review_id}/add_like")
                        .wrap(BearerAuthMiddleware::new(verifier.clone()))
                        .route(web::post().to(reviews::add_like)),
                )
                .service(
                    web::resource("/{review_id}/remove_like")
                        .wrap(BearerAuthMiddleware::new(verifier.clone()))
                        .route(web::delete().to(reviews::remove_like)),
                )
                .route("/{review_id}", web::get().to(reviews::review_detail)),
        )
        .service(
            web::scope("/users")
                .service(
                    web::resource("/my_account")
                        .wrap(BearerAuthMiddleware::new(verifier.clone()))
                        .route(web::get().to(users::my_account)),
                )
                .service(
                    web::resource("/bookmarks/add/{film_id}")
                        .wrap(BearerAuthMiddleware::new(verifier.clone()))
                        .route(web::post().to(users::add_bookmark)),
                )
                .service(
                    web::resource("/bookmarks/remove/{film_id}")
                        .wrap(BearerAuthMiddleware::new(verifier))
                        .route(web::delete().to(users::remove_bookmark)),
                )
                .route("/{user_id}", web::get().to(users::user_detail)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_bounds() {
        let query = PageQuery {
            page_size: 10,
            page_number: 1,
            sort: "_id".into(),
        };
        assert!(query.page().is_ok());

        let too_small = PageQuery {
            page_size: 5,
            ..query
        };
        assert!(too_small.page().is_err());

        let bad_number = PageQuery {
            page_size: 10,
            page_number: 0,
            sort: "_id".into(),
        };
        assert!(bad_number.page().is_err());
    }

    #[test]
    fn score_query_bounds() {
        assert_eq!(ScoreQuery { score: 10 }.validated().unwrap(), 10);
        assert!(ScoreQuery { score: 11 }.validated().is_err());
        assert!(ScoreQuery { score: -1 }.validated().is_err());
    }
}
