//! Result Cache
//!
//! Concurrent TTL cache of finished analyses, keyed by content fingerprint.
//! - Expired entries are dropped lazily on lookup and by [`ResultCache::purge_expired`]
//! - With a size bound, inserting into a full cache evicts the oldest entry
//! - Last write wins

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

use truthguard_core::{AnalysisResult, ContentFingerprint};

#[derive(Debug, Clone)]
struct CacheEntry {
    result: AnalysisResult,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// TTL cache of analysis results
#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<ContentFingerprint, CacheEntry>,
    ttl: Duration,
    max_entries: Option<usize>,
    hits: std::sync::atomic::AtomicU64,
    misses: std::sync::atomic::AtomicU64,
}

impl ResultCache {
    pub fn new(ttl: Duration, max_entries: Option<usize>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
            hits: Default::default(),
            misses: Default::default(),
        }
    }

    /// Look up a fresh result, dropping it if it has expired
    pub fn get(&self, key: &ContentFingerprint) -> Option<AnalysisResult> {
        use std::sync::atomic::Ordering;

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(self.ttl) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.result.clone());
            }
        }

        // The read guard above is released before removing.
        self.entries.remove_if(key, |_, entry| entry.is_expired(self.ttl));
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a result, replacing any previous one for the same key
    pub fn insert(&self, key: ContentFingerprint, result: AnalysisResult) {
        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.evict_oldest();
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(self.ttl));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!("Purged {} expired cache entries", removed);
        }
        removed
    }

    /// Run [`purge_expired`](Self::purge_expired) on a fixed period until the task is aborted
    pub fn spawn_purge_task(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                self.purge_expired();
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        use std::sync::atomic::Ordering;

        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            debug!("Cache full, evicting {}", key);
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthguard_core::{ContentKind, FactorSet, ResultHeader, VideoAnalysis};

    fn result(name: &str) -> AnalysisResult {
        AnalysisResult::Video(VideoAnalysis {
            header: ResultHeader::new(ContentKind::Video, FactorSet::neutral(ContentKind::Video), "s"),
            filename: name.to_string(),
            manipulation_detected: false,
            deepfake_confidence: 0,
            manipulated_elements: Vec::new(),
            inconsistencies: Vec::new(),
            basic_analysis: String::new(),
        })
    }

    fn key(name: &str) -> ContentFingerprint {
        ContentFingerprint::for_file(ContentKind::Video, name, 1)
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = ResultCache::new(Duration::from_secs(3600), None);
        let stored = result("a.mp4");
        cache.insert(key("a.mp4"), stored.clone());

        assert_eq!(cache.get(&key("a.mp4")), Some(stored));
        assert_eq!(cache.get(&key("b.mp4")), None);
        assert_eq!(cache.stats(), CacheStats { entries: 1, hits: 1, misses: 1 });
    }

    #[test]
    fn test_expired_entries_are_dropped_on_lookup() {
        let cache = ResultCache::new(Duration::ZERO, None);
        cache.insert(key("a.mp4"), result("a.mp4"));

        assert_eq!(cache.get(&key("a.mp4")), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let cache = ResultCache::new(Duration::ZERO, None);
        cache.insert(key("a.mp4"), result("a.mp4"));
        cache.insert(key("b.mp4"), result("b.mp4"));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = ResultCache::new(Duration::from_secs(3600), None);
        cache.insert(key("a.mp4"), result("first"));
        cache.insert(key("a.mp4"), result("second"));

        let AnalysisResult::Video(video) = cache.get(&key("a.mp4")).unwrap() else {
            panic!("expected a video result");
        };
        assert_eq!(video.filename, "second");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bounded_cache_evicts_oldest() {
        let cache = ResultCache::new(Duration::from_secs(3600), Some(2));
        cache.insert(key("a.mp4"), result("a"));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(key("b.mp4"), result("b"));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(key("c.mp4"), result("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("a.mp4")).is_none());
        assert!(cache.get(&key("c.mp4")).is_some());
    }

    #[test]
    fn test_overwrite_in_full_cache_does_not_evict() {
        let cache = ResultCache::new(Duration::from_secs(3600), Some(2));
        cache.insert(key("a.mp4"), result("a"));
        cache.insert(key("b.mp4"), result("b"));
        cache.insert(key("b.mp4"), result("b2"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("a.mp4")).is_some());
    }

    #[tokio::test]
    async fn test_purge_task_runs() {
        let cache = Arc::new(ResultCache::new(Duration::ZERO, None));
        cache.insert(key("a.mp4"), result("a"));

        let handle = cache.clone().spawn_purge_task(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(cache.is_empty());
    }
}
