/// MongoDB implementation of [`DocumentStore`].
use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database};

use super::{DocumentStore, RelatedJoin, StoreError};

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: &Client, db_name: &str) -> Self {
        Self {
            db: client.database(db_name),
        }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        sort: Document,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .collection(collection)
            .find(filter)
            .sort(sort)
            .skip(skip)
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.collection(collection).insert_one(document).await?;
        Ok(())
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let result = self.collection(collection).delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    async fn aggregate_related(
        &self,
        collection: &str,
        filter: Document,
        join: RelatedJoin<'_>,
        sort: Document,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let value_path = format!("$related.{}", join.value_field);
        let pipeline = vec![
            doc! { "$match": filter },
            doc! { "$lookup": {
                "from": join.related_collection,
                "localField": join.local_field,
                "foreignField": join.foreign_field,
                "as": "related",
            }},
            doc! { "$addFields": {
                "sum": { "$sum": &value_path },
                "avg": { "$avg": &value_path },
            }},
            doc! { "$project": { "related": 0 } },
            doc! { "$sort": sort },
            doc! { "$skip": skip as i64 },
            doc! { "$limit": limit },
        ];

        let cursor = self.collection(collection).aggregate(pipeline).await?;
        Ok(cursor.try_collect().await?)
    }
}
