use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use tokio::sync::RwLock;
use tracing::debug;

/// Cache key holding the JSON-encoded entry history, newest first.
pub const HISTORY_CACHE_KEY: &str = "userData";
/// Cache key holding the JSON-encoded authenticated session.
pub const SESSION_CACHE_KEY: &str = "authSession";

/// Keyed blob storage that survives process restarts.
///
/// Writes are complete once the returned future resolves; a subsequent
/// `read` of the same key from this process observes the written blob.
#[async_trait]
pub trait DurableCache: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>>;
    async fn write(&self, key: &str, blob: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid cache database url '{database_url}'"))?
            .create_if_missing(true);
        // Every pooled connection to an in-memory database sees its own empty database.
        let max_connections = if is_memory_url(database_url) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open cache database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run cache migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl DurableCache for Storage {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT blob FROM cache_entries WHERE cache_key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read cache key '{key}'"))?;
        Ok(row.map(|row| row.get::<String, _>(0)))
    }

    async fn write(&self, key: &str, blob: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cache_entries (cache_key, blob, updated_at)
            VALUES (?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(cache_key) DO UPDATE SET
                blob = excluded.blob,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(blob)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write cache key '{key}'"))?;
        debug!(key, size_bytes = blob.len(), "cache write");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM cache_entries WHERE cache_key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to remove cache key '{key}'"))?;
        debug!(key, "cache remove");
        Ok(())
    }
}

/// Process-local cache for tests and runs that must not touch disk.
#[derive(Default)]
pub struct InMemoryCache {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl DurableCache for InMemoryCache {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, blob: &str) -> Result<()> {
        self.blobs
            .write()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
