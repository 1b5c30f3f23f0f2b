use super::*;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::domain::EntryId;
use std::sync::atomic::{AtomicBool, Ordering};
use storage::InMemoryCache;

fn entry(id: i64, a: f64, b: f64, c: f64) -> DistributionEntry {
    DistributionEntry {
        id: EntryId(id),
        value_a: a,
        value_b: b,
        value_c: c,
        recorded_at: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
            + chrono::Duration::minutes(id),
    }
}

/// Cache whose writes can be switched to fail.
struct FlakyCache {
    inner: InMemoryCache,
    fail_writes: AtomicBool,
}

impl FlakyCache {
    fn new() -> Self {
        Self {
            inner: InMemoryCache::new(),
            fail_writes: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl DurableCache for FlakyCache {
    async fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, blob: &str) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("disk full"));
        }
        self.inner.write(key, blob).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.inner.remove(key).await
    }
}

async fn cached_entries(cache: &dyn DurableCache) -> Option<Vec<DistributionEntry>> {
    cache
        .read(HISTORY_CACHE_KEY)
        .await
        .expect("read")
        .map(|blob| serde_json::from_str(&blob).expect("decode cached history"))
}

#[tokio::test]
async fn prepend_puts_newest_entry_first_and_writes_through() {
    let cache = Arc::new(InMemoryCache::new());
    let store = HistoryStore::new(cache.clone());

    store.prepend(entry(1, 30.0, 30.0, 40.0)).await.expect("first");
    store.prepend(entry(2, 10.0, 10.0, 80.0)).await.expect("second");

    assert_eq!(store.first().await, Some(entry(2, 10.0, 10.0, 80.0)));
    let ids: Vec<_> = store.entries().await.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![EntryId(2), EntryId(1)]);
    assert_eq!(cached_entries(cache.as_ref()).await, Some(store.entries().await));
}

#[tokio::test]
async fn replace_all_keeps_order_and_overwrites_cache() {
    let cache = Arc::new(InMemoryCache::new());
    let store = HistoryStore::new(cache.clone());
    store.prepend(entry(1, 30.0, 30.0, 40.0)).await.expect("stale");

    let snapshot = vec![
        entry(9, 50.0, 25.0, 25.0),
        entry(7, 20.0, 20.0, 60.0),
        entry(8, 1.0, 1.0, 98.0),
    ];
    store.replace_all(snapshot.clone()).await.expect("replace");

    assert_eq!(store.entries().await, snapshot);
    assert_eq!(cached_entries(cache.as_ref()).await, Some(snapshot));
}

#[tokio::test]
async fn cached_snapshot_is_restored_by_a_fresh_store() {
    let cache: Arc<dyn DurableCache> = Arc::new(InMemoryCache::new());
    let first = HistoryStore::new(cache.clone());
    first
        .replace_all(vec![entry(2, 40.0, 40.0, 20.0), entry(1, 30.0, 30.0, 40.0)])
        .await
        .expect("seed");

    let restarted = HistoryStore::new(cache);
    assert!(restarted.is_empty().await);
    let restored = restarted.load_cached_snapshot().await.expect("restore");

    assert_eq!(restored.len(), 2);
    assert_eq!(restored, restarted.entries().await);
    assert_eq!(restored[0].id, EntryId(2));
}

#[tokio::test]
async fn missing_cache_restores_empty_history() {
    let store = HistoryStore::new(Arc::new(InMemoryCache::new()));
    assert!(store.load_cached_snapshot().await.expect("restore").is_empty());
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn unreadable_cache_blob_is_discarded() {
    let cache = Arc::new(InMemoryCache::new());
    cache
        .write(HISTORY_CACHE_KEY, "{not json")
        .await
        .expect("seed corrupt blob");
    let store = HistoryStore::new(cache.clone());

    assert!(store.load_cached_snapshot().await.expect("restore").is_empty());
    assert!(cache.read(HISTORY_CACHE_KEY).await.expect("read").is_none());
}

#[tokio::test]
async fn clear_empties_memory_and_cache() {
    let cache = Arc::new(InMemoryCache::new());
    let store = HistoryStore::new(cache.clone());
    store.prepend(entry(1, 30.0, 30.0, 40.0)).await.expect("seed");

    store.clear().await.expect("clear");

    assert!(store.is_empty().await);
    assert!(cache.read(HISTORY_CACHE_KEY).await.expect("read").is_none());
}

#[tokio::test]
async fn failed_cache_write_leaves_memory_unchanged() {
    let cache = Arc::new(FlakyCache::new());
    let store = HistoryStore::new(cache.clone());
    store.prepend(entry(1, 30.0, 30.0, 40.0)).await.expect("seed");

    cache.fail_writes.store(true, Ordering::SeqCst);

    let err = store
        .prepend(entry(2, 10.0, 10.0, 80.0))
        .await
        .expect_err("prepend must fail");
    assert!(matches!(err, CacheError::Backend(_)));
    let err = store
        .replace_all(vec![entry(5, 1.0, 1.0, 98.0)])
        .await
        .expect_err("replace must fail");
    assert!(err.to_string().contains("disk full"));

    let expected = vec![entry(1, 30.0, 30.0, 40.0)];
    assert_eq!(store.entries().await, expected);
    assert_eq!(cached_entries(cache.as_ref()).await, Some(expected));
}
