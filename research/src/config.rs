//! Benchmark configuration, read from the environment.

use std::env;

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub mongo_host: String,
    pub mongo_port: u16,
    pub cassandra_host: String,
    /// Bookmark rows to insert and read back.
    pub bookmarks_count: usize,
    /// Like rows to insert and aggregate over.
    pub likes_count: usize,
    /// Controls how many distinct films the likes spread across:
    /// `films_count = log(likes_count) / log(films_count_factor)`.
    pub films_count_factor: f64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl BenchConfig {
    pub fn from_env() -> Self {
        Self {
            mongo_host: env_or("MONGO_HOST", "127.0.0.1".to_string()),
            mongo_port: env_or("MONGO_PORT", 27017),
            cassandra_host: env_or("CASSANDRA_HOST", "127.0.0.1".to_string()),
            bookmarks_count: env_or("BOOKMARKS_COUNT", 100_000),
            likes_count: env_or("LIKES_COUNT", 100_000),
            films_count_factor: env_or("FILMS_COUNT_FACTOR", 1.001),
        }
    }

    pub fn mongo_url(&self) -> String {
        format!("mongodb://{}:{}", self.mongo_host, self.mongo_port)
    }

    /// Number of distinct films the like workload targets. Kept at one or
    /// more so small runs still aggregate something.
    pub fn films_count(&self) -> usize {
        let films = (self.likes_count as f64).log(self.films_count_factor);
        (films as usize).max(1)
    }
}
