/// Generic UGC service: search/get/create/delete against one collection,
/// keyed by optional `(obj_id, user_id)` filters.
use std::marker::PhantomData;
use std::sync::Arc;

use bson::Document;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{DocumentStore, StoreError};

/// Page size used when a caller needs "everything" (rating fan-out).
pub const MAX_PAGE_SIZE: i64 = 9999;

/// Pagination: `skip = size * (number - 1)`.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub size: i64,
    pub number: i64,
}

impl Page {
    pub fn first(size: i64) -> Self {
        Self { size, number: 1 }
    }

    pub fn offset(&self) -> u64 {
        (self.size * (self.number - 1)) as u64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(10)
    }
}

/// Parse a sort string into a sort document. A `-` prefix means descending:
/// `"-date"` sorts newest first, the default `_id` oldest first.
pub fn sort_doc(sort: &str) -> Document {
    let (field, order) = match sort.strip_prefix('-') {
        Some(field) => (field, -1),
        None => (sort, 1),
    };
    let mut doc = Document::new();
    doc.insert(field, order);
    doc
}

/// Generic service over one UGC collection.
///
/// `T` is the record type; (obj, user) pairs are unique by convention, so
/// `create` replaces any previous record for the pair (last write wins).
pub struct UgcService<T> {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
    _record: PhantomData<T>,
}

impl<T> Clone for UgcService<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            collection: self.collection,
            _record: PhantomData,
        }
    }
}

impl<T> UgcService<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str) -> Self {
        Self {
            store,
            collection,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// Ids are stored as strings for straightforward BSON round-tripping.
    pub fn filter(obj_id: Option<Uuid>, user_id: Option<Uuid>) -> Document {
        let mut query = Document::new();
        if let Some(obj_id) = obj_id {
            query.insert("obj_id", obj_id.to_string());
        }
        if let Some(user_id) = user_id {
            query.insert("user_id", user_id.to_string());
        }
        query
    }

    /// Point lookup by `(obj_id, user_id)`.
    pub async fn get(&self, obj_id: Uuid, user_id: Uuid) -> Result<Option<T>, StoreError> {
        self.find_one(Self::filter(Some(obj_id), Some(user_id)))
            .await
    }

    /// Point lookup with an arbitrary filter.
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError> {
        match self.store.find_one(self.collection, filter).await? {
            Some(doc) => Ok(Some(bson::from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Filtered listing with pagination and sorting.
    pub async fn search(
        &self,
        obj_id: Option<Uuid>,
        user_id: Option<Uuid>,
        page: Page,
        sort: &str,
    ) -> Result<Vec<T>, StoreError> {
        let docs = self
            .store
            .find_many(
                self.collection,
                Self::filter(obj_id, user_id),
                sort_doc(sort),
                page.size,
                page.offset(),
            )
            .await?;

        docs.into_iter()
            .map(|doc| bson::from_document(doc).map_err(StoreError::from))
            .collect()
    }

    /// Create a record for `(obj_id, user_id)`, replacing any previous one,
    /// with `date` set to now. `extra` carries the record-specific fields.
    pub async fn create(
        &self,
        obj_id: Uuid,
        user_id: Uuid,
        extra: Document,
    ) -> Result<(), StoreError> {
        if self.get(obj_id, user_id).await?.is_some() {
            self.delete(Some(obj_id), Some(user_id)).await?;
        }

        let mut document = Self::filter(Some(obj_id), Some(user_id));
        document.extend(extra);
        document.insert("date", bson::to_bson(&Utc::now())?);
        self.store.insert_one(self.collection, document).await
    }

    /// Delete records matching the `(obj_id, user_id)` filter. The pair is
    /// unique by convention, so scoped deletes remove at most one record.
    pub async fn delete(
        &self,
        obj_id: Option<Uuid>,
        user_id: Option<Uuid>,
    ) -> Result<u64, StoreError> {
        self.store
            .delete_many(self.collection, Self::filter(obj_id, user_id))
            .await
    }
}
