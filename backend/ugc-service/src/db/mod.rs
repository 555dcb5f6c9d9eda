/// Document store abstraction.
///
/// The service layer talks to storage through [`DocumentStore`] so the
/// MongoDB backend can be swapped for an in-memory double in tests.
use async_trait::async_trait;
use bson::Document;
use thiserror::Error;

pub mod mongo;

pub use mongo::MongoStore;

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("document decode error: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("document encode error: {0}")]
    Encode(#[from] bson::ser::Error),
}

/// A `$lookup`-style join against a related collection, adding `sum` and
/// `avg` of a related numeric field to each result document.
#[derive(Debug, Clone, Copy)]
pub struct RelatedJoin<'a> {
    /// Collection to join with
    pub related_collection: &'a str,
    /// Field on the local document
    pub local_field: &'a str,
    /// Field on the related documents
    pub foreign_field: &'a str,
    /// Related numeric field to sum and average
    pub value_field: &'a str,
}

/// Minimal document-oriented storage interface: point lookups, filtered
/// listings with sort and pagination, inserts, bulk deletes and one join
/// shape for rating aggregation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find a single document matching `filter`.
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Find documents matching `filter`, sorted, with limit/offset paging.
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        sort: Document,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert one document.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Delete every document matching `filter`, returning the count.
    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Filtered listing joined against a related collection; each result
    /// document carries `sum` and `avg` of the related value field and the
    /// sort may refer to either.
    async fn aggregate_related(
        &self,
        collection: &str,
        filter: Document,
        join: RelatedJoin<'_>,
        sort: Document,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Document>, StoreError>;
}
