/// Concrete UGC services: likes, reviews and bookmarks.
///
/// Film likes and review likes share the record type and service but live in
/// separate collections.
use std::sync::Arc;

use bson::{doc, Document};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{DocumentStore, RelatedJoin, StoreError};
use crate::models::{Bookmark, Like, Review, ReviewBrief};

use super::ugc::{sort_doc, Page, UgcService};

pub const LIKES_COLLECTION: &str = "like";
pub const REVIEW_LIKES_COLLECTION: &str = "review_like";
pub const REVIEWS_COLLECTION: &str = "review";
pub const BOOKMARKS_COLLECTION: &str = "bookmarks";

/// Likes and dislikes for films or reviews.
#[derive(Clone)]
pub struct LikeService {
    inner: UgcService<Like>,
}

impl LikeService {
    /// Likes attached to films.
    pub fn for_films(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: UgcService::new(store, LIKES_COLLECTION),
        }
    }

    /// Likes attached to reviews (`obj_id` is the review id).
    pub fn for_reviews(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: UgcService::new(store, REVIEW_LIKES_COLLECTION),
        }
    }

    /// Upsert the user's score: 10 is a like, 0 a dislike.
    pub async fn rate(&self, obj_id: Uuid, user_id: Uuid, score: i32) -> Result<(), StoreError> {
        self.inner
            .create(obj_id, user_id, doc! { "score": score })
            .await
    }

    pub async fn get(&self, obj_id: Uuid, user_id: Uuid) -> Result<Option<Like>, StoreError> {
        self.inner.get(obj_id, user_id).await
    }

    pub async fn search(
        &self,
        obj_id: Option<Uuid>,
        user_id: Option<Uuid>,
        page: Page,
        sort: &str,
    ) -> Result<Vec<Like>, StoreError> {
        self.inner.search(obj_id, user_id, page, sort).await
    }

    pub async fn delete(&self, obj_id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        self.inner.delete(Some(obj_id), Some(user_id)).await
    }
}

/// Result shape of the review rating aggregation.
#[derive(Debug, Deserialize)]
struct RatedReview {
    review_id: Uuid,
    user_id: Uuid,
    obj_id: Uuid,
    title: String,
    text: String,
    #[serde(default)]
    sum: Option<i64>,
    #[serde(default)]
    avg: Option<f64>,
}

/// Film reviews.
#[derive(Clone)]
pub struct ReviewService {
    inner: UgcService<Review>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: UgcService::new(store, REVIEWS_COLLECTION),
        }
    }

    /// Upsert the user's review of a film, assigning a fresh `review_id`.
    pub async fn create(
        &self,
        obj_id: Uuid,
        user_id: Uuid,
        title: &str,
        text: &str,
    ) -> Result<(), StoreError> {
        let extra = doc! {
            "review_id": Uuid::new_v4().to_string(),
            "title": title,
            "text": text,
        };
        self.inner.create(obj_id, user_id, extra).await
    }

    pub async fn get_by_id(&self, review_id: Uuid) -> Result<Option<Review>, StoreError> {
        self.inner
            .find_one(doc! { "review_id": review_id.to_string() })
            .await
    }

    pub async fn search(
        &self,
        obj_id: Option<Uuid>,
        user_id: Option<Uuid>,
        page: Page,
        sort: &str,
    ) -> Result<Vec<Review>, StoreError> {
        self.inner.search(obj_id, user_id, page, sort).await
    }

    pub async fn delete(&self, obj_id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        self.inner.delete(Some(obj_id), Some(user_id)).await
    }

    /// Reviews of a film joined against review likes, each entry carrying
    /// summed and averaged scores. Sortable by `-avg` / `-sum` as well as
    /// record fields.
    pub async fn rated_by_film(
        &self,
        film_id: Uuid,
        page: Page,
        sort: &str,
    ) -> Result<Vec<ReviewBrief>, StoreError> {
        let filter: Document = UgcService::<Review>::filter(Some(film_id), None);
        let join = RelatedJoin {
            related_collection: REVIEW_LIKES_COLLECTION,
            local_field: "review_id",
            foreign_field: "obj_id",
            value_field: "score",
        };

        let docs = self
            .inner
            .store()
            .aggregate_related(
                self.inner.collection(),
                filter,
                join,
                sort_doc(sort),
                page.size,
                page.offset(),
            )
            .await?;

        docs.into_iter()
            .map(|doc| {
                let rated: RatedReview = bson::from_document(doc)?;
                Ok(ReviewBrief {
                    review_id: rated.review_id,
                    title: rated.title,
                    text: rated.text,
                    film_id: rated.obj_id,
                    user_id: rated.user_id,
                    absolute_rating: rated.sum,
                    average_rating: rated.avg,
                })
            })
            .collect()
    }
}

/// Viewing bookmarks.
#[derive(Clone)]
pub struct BookmarkService {
    inner: UgcService<Bookmark>,
}

impl BookmarkService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: UgcService::new(store, BOOKMARKS_COLLECTION),
        }
    }

    pub async fn create(
        &self,
        obj_id: Uuid,
        user_id: Uuid,
        timestamp: i64,
    ) -> Result<(), StoreError> {
        self.inner
            .create(obj_id, user_id, doc! { "timestamp": timestamp })
            .await
    }

    pub async fn get(&self, obj_id: Uuid, user_id: Uuid) -> Result<Option<Bookmark>, StoreError> {
        self.inner.get(obj_id, user_id).await
    }

    pub async fn search(
        &self,
        obj_id: Option<Uuid>,
        user_id: Option<Uuid>,
        page: Page,
        sort: &str,
    ) -> Result<Vec<Bookmark>, StoreError> {
        self.inner.search(obj_id, user_id, page, sort).await
    }

    pub async fn delete(&self, obj_id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        self.inner.delete(Some(obj_id), Some(user_id)).await
    }
}
