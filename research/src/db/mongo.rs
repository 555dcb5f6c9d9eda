//! MongoDB side of the benchmark.

use anyhow::Result;
use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use uuid::Uuid;

use super::{BenchStore, BookmarkRow, LikeRow};

const DB_NAME: &str = "research";
const BOOKMARKS_COLLECTION: &str = "bookmarks";
const LIKES_COLLECTION: &str = "likes";

pub struct MongoBench {
    db: Database,
}

impl MongoBench {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await?;
        let db = client.database(DB_NAME);
        db.run_command(doc! { "ping": 1 }).await?;

        let bench = Self { db };
        bench.create_indexes().await?;
        Ok(bench)
    }

    async fn create_indexes(&self) -> Result<()> {
        self.db
            .collection::<Document>(BOOKMARKS_COLLECTION)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        self.db
            .collection::<Document>(LIKES_COLLECTION)
            .create_index(
                IndexModel::builder().keys(doc! { "film_id": 1 }).build(),
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl BenchStore for MongoBench {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn insert_bookmarks(&self, rows: &[BookmarkRow]) -> Result<()> {
        let docs: Vec<Document> = rows
            .iter()
            .map(|row| {
                let film_ids: Vec<Bson> = row
                    .film_ids
                    .iter()
                    .map(|id| Bson::String(id.to_string()))
                    .collect();
                doc! { "user_id": row.user_id.to_string(), "film_ids": film_ids }
            })
            .collect();

        self.db
            .collection::<Document>(BOOKMARKS_COLLECTION)
            .insert_many(docs)
            .await?;
        Ok(())
    }

    async fn user_films(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let found = self
            .db
            .collection::<Document>(BOOKMARKS_COLLECTION)
            .find_one(doc! { "user_id": user_id.to_string() })
            .await?;

        let Some(doc) = found else {
            return Ok(Vec::new());
        };
        let films = doc
            .get_array("film_ids")?
            .iter()
            .filter_map(|value| value.as_str())
            .filter_map(|raw| Uuid::parse_str(raw).ok())
            .collect();
        Ok(films)
    }

    async fn insert_likes(&self, rows: &[LikeRow]) -> Result<()> {
        let docs: Vec<Document> = rows
            .iter()
            .map(|row| {
                doc! {
                    "film_id": row.film_id.to_string(),
                    "user_id": row.user_id.to_string(),
                    "score": i32::from(row.score),
                }
            })
            .collect();

        self.db
            .collection::<Document>(LIKES_COLLECTION)
            .insert_many(docs)
            .await?;
        Ok(())
    }

    async fn insert_like(&self, row: &LikeRow) -> Result<()> {
        self.db
            .collection::<Document>(LIKES_COLLECTION)
            .insert_one(doc! {
                "film_id": row.film_id.to_string(),
                "user_id": row.user_id.to_string(),
                "score": i32::from(row.score),
            })
            .await?;
        Ok(())
    }

    async fn average_score(&self, film_id: Uuid) -> Result<Option<f64>> {
        let pipeline = vec![
            doc! { "$match": { "film_id": film_id.to_string() } },
            doc! { "$group": { "_id": "$film_id", "avg": { "$avg": "$score" } } },
        ];

        let mut cursor = self
            .db
            .collection::<Document>(LIKES_COLLECTION)
            .aggregate(pipeline)
            .await?;

        match cursor.try_next().await? {
            Some(doc) => Ok(doc.get("avg").and_then(Bson::as_f64)),
            None => Ok(None),
        }
    }

    async fn teardown(&self) -> Result<()> {
        self.db.drop().await?;
        Ok(())
    }
}
