//! Cassandra side of the benchmark, driven through the scylla driver.

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use scylla::prepared_statement::PreparedStatement;
use scylla::{Session, SessionBuilder};
use uuid::Uuid;

use super::{BenchStore, BookmarkRow, LikeRow};

const KEYSPACE: &str = "research";
const INSERT_CONCURRENCY: usize = 64;

pub struct CassandraBench {
    session: Session,
    insert_bookmark: PreparedStatement,
    insert_like: PreparedStatement,
    select_films: PreparedStatement,
    select_avg: PreparedStatement,
}

impl CassandraBench {
    pub async fn connect(host: &str) -> Result<Self> {
        let session = SessionBuilder::new().known_node(host).build().await?;

        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {KEYSPACE} WITH replication = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
                ),
                (),
            )
            .await?;
        session.use_keyspace(KEYSPACE, false).await?;
        session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS bookmarks \
                 (user_id uuid PRIMARY KEY, film_ids set<uuid>)",
                (),
            )
            .await?;
        session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS likes \
                 (film_id uuid, user_id uuid, score smallint, \
                 PRIMARY KEY (film_id, user_id))",
                (),
            )
            .await?;

        let insert_bookmark = session
            .prepare("INSERT INTO bookmarks (user_id, film_ids) VALUES (?, ?)")
            .await?;
        let insert_like = session
            .prepare("INSERT INTO likes (film_id, user_id, score) VALUES (?, ?, ?)")
            .await?;
        let select_films = session
            .prepare("SELECT film_ids FROM bookmarks WHERE user_id = ?")
            .await?;
        let select_avg = session
            .prepare("SELECT AVG(score) FROM likes WHERE film_id = ?")
            .await?;

        Ok(Self {
            session,
            insert_bookmark,
            insert_like,
            select_films,
            select_avg,
        })
    }
}

#[async_trait]
impl BenchStore for CassandraBench {
    fn name(&self) -> &'static str {
        "cassandra"
    }

    async fn insert_bookmarks(&self, rows: &[BookmarkRow]) -> Result<()> {
        let futures: Vec<_> = rows
            .iter()
            .map(|row| {
                self.session
                    .execute_unpaged(&self.insert_bookmark, (row.user_id, &row.film_ids))
            })
            .collect();
        let mut inserts = stream::iter(futures).buffer_unordered(INSERT_CONCURRENCY);

        while let Some(result) = inserts.next().await {
            result?;
        }
        Ok(())
    }

    async fn user_films(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let result = self
            .session
            .execute_unpaged(&self.select_films, (user_id,))
            .await?
            .into_rows_result()?;

        let row = result.maybe_first_row::<(Option<Vec<Uuid>>,)>()?;
        Ok(row.and_then(|(films,)| films).unwrap_or_default())
    }

    async fn insert_likes(&self, rows: &[LikeRow]) -> Result<()> {
        let futures: Vec<_> = rows
            .iter()
            .map(|row| {
                self.session
                    .execute_unpaged(&self.insert_like, (row.film_id, row.user_id, row.score))
            })
            .collect();
        let mut inserts = stream::iter(futures).buffer_unordered(INSERT_CONCURRENCY);

        while let Some(result) = inserts.next().await {
            result?;
        }
        Ok(())
    }

    async fn insert_like(&self, row: &LikeRow) -> Result<()> {
        self.session
            .execute_unpaged(&self.insert_like, (row.film_id, row.user_id, row.score))
            .await?;
        Ok(())
    }

    async fn average_score(&self, film_id: Uuid) -> Result<Option<f64>> {
        let result = self
            .session
            .execute_unpaged(&self.select_avg, (film_id,))
            .await?
            .into_rows_result()?;

        // CQL AVG keeps the column type, so the average of smallints
        // comes back as a smallint.
        let (avg,) = result.first_row::<(Option<i16>,)>()?;
        Ok(avg.map(f64::from))
    }

    async fn teardown(&self) -> Result<()> {
        self.session
            .query_unpaged(format!("DROP KEYSPACE IF EXISTS {KEYSPACE}"), ())
            .await?;
        Ok(())
    }
}
