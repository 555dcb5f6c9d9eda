//! Latency benchmark comparing MongoDB and Cassandra on the UGC workloads:
//! bookmark point reads, like-score aggregation, and per-like insert+read.
//!
//! Both backends get the same generated dataset shapes, run the same three
//! workloads with every operation timed one at a time, and are dropped
//! afterwards.

mod config;
mod db;
mod report;

use std::time::Instant;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use config::BenchConfig;
use db::{BenchStore, BookmarkRow, CassandraBench, LikeRow, MongoBench};
use report::LatencyReport;

const INSERT_CHUNK: usize = 1000;

/// One row per bookmark: a fresh user paired with a single film.
fn generate_bookmarks(count: usize) -> Vec<BookmarkRow> {
    (0..count)
        .map(|_| BookmarkRow {
            user_id: Uuid::new_v4(),
            film_ids: vec![Uuid::new_v4()],
        })
        .collect()
}

fn generate_likes(count: usize, films: &[Uuid]) -> Vec<LikeRow> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| LikeRow {
            film_id: *films.choose(&mut rng).unwrap_or(&Uuid::nil()),
            user_id: Uuid::new_v4(),
            score: rng.gen_range(0..=10),
        })
        .collect()
}

/// Bookmark point reads: the inserts are untimed setup, then one read of a
/// randomly chosen user per bookmark row.
async fn bench_bookmarks(
    store: &dyn BenchStore,
    bookmarks: &[BookmarkRow],
) -> Result<LatencyReport> {
    for chunk in bookmarks.chunks(INSERT_CHUNK) {
        store.insert_bookmarks(chunk).await?;
    }

    let mut rng = rand::thread_rng();
    let mut reads = LatencyReport::new();
    for _ in 0..bookmarks.len() {
        let Some(row) = bookmarks.choose(&mut rng) else {
            break;
        };
        let user_id = row.user_id;

        let started = Instant::now();
        store.user_films(user_id).await?;
        reads.record(started.elapsed());
    }
    Ok(reads)
}

/// Aggregate the average score of every film once the like dataset is in
/// place. The inserts here are setup, not part of the measurement.
async fn bench_likes_read(
    store: &dyn BenchStore,
    likes: &[LikeRow],
    films: &[Uuid],
) -> Result<LatencyReport> {
    for chunk in likes.chunks(INSERT_CHUNK) {
        store.insert_likes(chunk).await?;
    }

    let mut reads = LatencyReport::new();
    for film_id in films {
        let started = Instant::now();
        store.average_score(*film_id).await?;
        reads.record(started.elapsed());
    }
    Ok(reads)
}

/// Per-like write-then-read latency: each sample times one single-row
/// insert followed by the average-score read for that like's film, strictly
/// one pair at a time.
async fn bench_likes_insert_read(
    store: &dyn BenchStore,
    likes: &[LikeRow],
) -> Result<LatencyReport> {
    let mut samples = LatencyReport::new();
    for like in likes {
        let started = Instant::now();
        store.insert_like(like).await?;
        store.average_score(like.film_id).await?;
        samples.record(started.elapsed());
    }
    Ok(samples)
}

async fn run_backend(store: &dyn BenchStore, config: &BenchConfig, films: &[Uuid]) -> Result<()> {
    tracing::info!(backend = store.name(), "starting benchmark");

    let bookmarks = generate_bookmarks(config.bookmarks_count);
    let reads = bench_bookmarks(store, &bookmarks).await?;
    reads.summarize(store.name(), "bookmarks read");

    let likes = generate_likes(config.likes_count, films);
    let reads = bench_likes_read(store, &likes, films).await?;
    reads.summarize(store.name(), "likes read");

    let extra = generate_likes(config.likes_count, films);
    let samples = bench_likes_insert_read(store, &extra).await?;
    samples.summarize(store.name(), "likes insert+read");

    store.teardown().await?;
    tracing::info!(backend = store.name(), "benchmark finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BenchConfig::from_env();
    let films: Vec<Uuid> = (0..config.films_count()).map(|_| Uuid::new_v4()).collect();
    tracing::info!(
        bookmarks = config.bookmarks_count,
        likes = config.likes_count,
        films = films.len(),
        "generated workload parameters"
    );

    let mongo = MongoBench::connect(&config.mongo_url()).await?;
    run_backend(&mongo, &config, &films).await?;

    let cassandra = CassandraBench::connect(&config.cassandra_host).await?;
    run_backend(&cassandra, &config, &films).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        bookmark_rows: AtomicUsize,
        film_reads: AtomicUsize,
        like_rows: AtomicUsize,
        single_like_inserts: AtomicUsize,
        avg_reads: AtomicUsize,
    }

    #[async_trait]
    impl BenchStore for CountingStore {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn insert_bookmarks(&self, rows: &[BookmarkRow]) -> Result<()> {
            self.bookmark_rows.fetch_add(rows.len(), Ordering::SeqCst);
            Ok(())
        }

        async fn user_films(&self, _user_id: Uuid) -> Result<Vec<Uuid>> {
            self.film_reads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Uuid::new_v4()])
        }

        async fn insert_likes(&self, rows: &[LikeRow]) -> Result<()> {
            self.like_rows.fetch_add(rows.len(), Ordering::SeqCst);
            Ok(())
        }

        async fn insert_like(&self, _row: &LikeRow) -> Result<()> {
            self.single_like_inserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn average_score(&self, _film_id: Uuid) -> Result<Option<f64>> {
            self.avg_reads.fetch_add(1, Ordering::SeqCst);
            Ok(Some(5.0))
        }

        async fn teardown(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bookmarks_pair_one_user_with_one_film() {
        let bookmarks = generate_bookmarks(50);
        assert_eq!(bookmarks.len(), 50);
        assert!(bookmarks.iter().all(|row| row.film_ids.len() == 1));
    }

    #[test]
    fn likes_draw_films_from_the_given_pool() {
        let films = vec![Uuid::new_v4(), Uuid::new_v4()];
        let likes = generate_likes(100, &films);
        assert_eq!(likes.len(), 100);
        assert!(likes
            .iter()
            .all(|like| films.contains(&like.film_id) && (0..=10).contains(&like.score)));
    }

    #[tokio::test]
    async fn insert_read_workload_records_one_sample_per_like() {
        let store = CountingStore::default();
        let films = vec![Uuid::new_v4()];
        let likes = generate_likes(250, &films);

        let samples = bench_likes_insert_read(&store, &likes).await.unwrap();

        assert_eq!(samples.len(), 250);
        assert_eq!(store.single_like_inserts.load(Ordering::SeqCst), 250);
        assert_eq!(store.avg_reads.load(Ordering::SeqCst), 250);
        // The batch insert path is setup-only and must stay out of this
        // workload.
        assert_eq!(store.like_rows.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bookmark_reads_sample_every_row_once_inserted() {
        let store = CountingStore::default();
        let bookmarks = generate_bookmarks(120);

        let reads = bench_bookmarks(&store, &bookmarks).await.unwrap();

        assert_eq!(store.bookmark_rows.load(Ordering::SeqCst), 120);
        assert_eq!(reads.len(), 120);
        assert_eq!(store.film_reads.load(Ordering::SeqCst), 120);
    }
}
