use std::sync::Arc;

use shared::domain::DistributionEntry;
use storage::{DurableCache, HISTORY_CACHE_KEY};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::CacheError;

/// Confirmed submissions, newest first, mirrored into the durable cache.
///
/// Every mutating call writes the cache while holding the in-memory lock and
/// only commits the in-memory change once the cache write succeeded, so the
/// two never disagree after a call returns.
pub struct HistoryStore {
    cache: Arc<dyn DurableCache>,
    entries: Mutex<Vec<DistributionEntry>>,
}

impl HistoryStore {
    pub fn new(cache: Arc<dyn DurableCache>) -> Self {
        Self {
            cache,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Overwrites history with a server snapshot.
    pub async fn replace_all(&self, entries: Vec<DistributionEntry>) -> Result<(), CacheError> {
        let mut guard = self.entries.lock().await;
        let blob = serde_json::to_string(&entries)?;
        self.cache.write(HISTORY_CACHE_KEY, &blob).await?;
        debug!(entries = entries.len(), "history: replaced from server snapshot");
        *guard = entries;
        Ok(())
    }

    pub async fn prepend(&self, entry: DistributionEntry) -> Result<(), CacheError> {
        let mut guard = self.entries.lock().await;
        guard.insert(0, entry);
        let written = match serde_json::to_string(&*guard) {
            Ok(blob) => self
                .cache
                .write(HISTORY_CACHE_KEY, &blob)
                .await
                .map_err(CacheError::from),
            Err(err) => Err(CacheError::from(err)),
        };
        if let Err(err) = written {
            guard.remove(0);
            return Err(err);
        }
        debug!(entries = guard.len(), "history: prepended confirmed entry");
        Ok(())
    }

    /// Restores history from the durable cache. A blob that no longer decodes
    /// is dropped from the cache and treated as empty history.
    pub async fn load_cached_snapshot(&self) -> Result<Vec<DistributionEntry>, CacheError> {
        let mut guard = self.entries.lock().await;
        let restored = match self.cache.read(HISTORY_CACHE_KEY).await? {
            None => Vec::new(),
            Some(blob) => match serde_json::from_str::<Vec<DistributionEntry>>(&blob) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("history: discarding unreadable cached snapshot: {err}");
                    self.cache.remove(HISTORY_CACHE_KEY).await?;
                    Vec::new()
                }
            },
        };
        debug!(entries = restored.len(), "history: restored cached snapshot");
        *guard = restored.clone();
        Ok(restored)
    }

    pub async fn clear(&self) -> Result<(), CacheError> {
        let mut guard = self.entries.lock().await;
        self.cache.remove(HISTORY_CACHE_KEY).await?;
        guard.clear();
        Ok(())
    }

    pub async fn entries(&self) -> Vec<DistributionEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn first(&self) -> Option<DistributionEntry> {
        self.entries.lock().await.first().cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
