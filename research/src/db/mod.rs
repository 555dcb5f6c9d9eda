//! Storage backends under test.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod cassandra;
pub mod mongo;

pub use cassandra::CassandraBench;
pub use mongo::MongoBench;

/// One user's bookmarked films.
#[derive(Debug, Clone)]
pub struct BookmarkRow {
    pub user_id: Uuid,
    pub film_ids: Vec<Uuid>,
}

/// One film rating by one user.
#[derive(Debug, Clone)]
pub struct LikeRow {
    pub film_id: Uuid,
    pub user_id: Uuid,
    pub score: i16,
}

/// The operations both backends must support for the benchmark. The chunked
/// inserts exist for untimed dataset setup; timed writes go through the
/// single-row [`BenchStore::insert_like`].
#[async_trait]
pub trait BenchStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn insert_bookmarks(&self, rows: &[BookmarkRow]) -> Result<()>;

    /// Point read: the bookmarked film ids of one user.
    async fn user_films(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    async fn insert_likes(&self, rows: &[LikeRow]) -> Result<()>;

    /// Single-row like insert, used by the timed write path.
    async fn insert_like(&self, row: &LikeRow) -> Result<()>;

    /// Aggregate read: the average score of one film, `None` when the film
    /// has no likes.
    async fn average_score(&self, film_id: Uuid) -> Result<Option<f64>>;

    /// Drop all benchmark data.
    async fn teardown(&self) -> Result<()>;
}
