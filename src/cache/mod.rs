//! Summoner statistics cache.
//!
//! Read-through LRU keyed by normalized summoner identity:
//! - Hits return the shared handle and touch recency
//! - Concurrent misses for one key coalesce into a single upstream fetch
//! - Inserts evict the least recently used entry at capacity and rebuild
//!   the overall aggregate before any waiter is woken
//!
//! Failures (not-found, network, timeout) surface to every coalesced
//! waiter and are never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, warn};

use crate::calculate;
use crate::catalog::ChampionCatalog;
use crate::models::{
    IdentityError, OverallAggregate, Region, SummonerId, SummonerKey, SummonerStatistic,
    UnknownRegion,
};
use crate::source::{SourceError, SummonerSource};

/// Errors surfaced to lookup callers.
///
/// `Clone` because one failed fetch fans out to every coalesced waiter.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("invalid summoner identity: {0}")]
    InvalidIdentity(String),

    #[error("summoner not found: {0}")]
    NotFound(String),

    #[error("upstream fetch failed: {0}")]
    FetchFailure(String),
}

impl From<IdentityError> for LookupError {
    fn from(err: IdentityError) -> Self {
        LookupError::InvalidIdentity(err.to_string())
    }
}

impl From<UnknownRegion> for LookupError {
    fn from(err: UnknownRegion) -> Self {
        LookupError::InvalidIdentity(err.to_string())
    }
}

/// Tunable cache behavior.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Maximum number of resident summoners. Must be at least 1; the
    /// config layer rejects zero.
    pub capacity: usize,

    /// Upper bound on a single upstream fetch.
    pub fetch_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 256,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    evictions: AtomicU64,
}

/// Outcome shared by every waiter of one coalesced fetch.
type FetchOutcome = Result<Arc<SummonerStatistic>, LookupError>;

struct CacheInner {
    /// Resident entries, least recently used first.
    entries: IndexMap<SummonerKey, Arc<SummonerStatistic>>,

    /// One watch channel per key with a fetch in progress.
    in_flight: HashMap<SummonerKey, watch::Receiver<Option<FetchOutcome>>>,
}

/// Shared summoner cache. Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct SummonerCache {
    source: Arc<dyn SummonerSource>,
    catalog: Arc<ChampionCatalog>,
    settings: CacheSettings,
    inner: Arc<Mutex<CacheInner>>,
    overall: Arc<RwLock<OverallAggregate>>,
    counters: Arc<Counters>,
}

impl SummonerCache {
    pub fn new(
        source: Arc<dyn SummonerSource>,
        catalog: Arc<ChampionCatalog>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            source,
            catalog,
            settings,
            inner: Arc::new(Mutex::new(CacheInner {
                entries: IndexMap::new(),
                in_flight: HashMap::new(),
            })),
            overall: Arc::new(RwLock::new(OverallAggregate::new())),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Validate a raw identity and fetch its statistic through the cache.
    pub async fn lookup(
        &self,
        region: &str,
        name: &str,
    ) -> Result<Arc<SummonerStatistic>, LookupError> {
        let region: Region = region.parse()?;
        let id = SummonerId::new(region, name)?;
        self.get(&id).await
    }

    /// Read-through lookup.
    ///
    /// Hit: touch recency, return the shared handle. Miss: join the
    /// in-flight fetch for this key, or start one, and await its
    /// outcome.
    pub async fn get(&self, id: &SummonerId) -> Result<Arc<SummonerStatistic>, LookupError> {
        let key = id.key().clone();

        let mut rx = {
            let mut inner = self.inner.lock().await;

            if let Some(idx) = inner.entries.get_index_of(&key) {
                let last = inner.entries.len() - 1;
                inner.entries.move_index(idx, last);
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(inner.entries[last].clone());
            }

            if let Some(rx) = inner.in_flight.get(&key) {
                self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                rx.clone()
            } else {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = watch::channel(None);
                inner.in_flight.insert(key, rx.clone());

                // Detached: a cancelled waiter must not abort the fetch
                // that other waiters share.
                let task_cache = self.clone();
                let task_id = id.clone();
                tokio::spawn(async move { task_cache.run_fetch(task_id, tx).await });
                rx
            }
        };

        wait_shared(&mut rx).await
    }

    /// Drop a summoner from the cache. Returns whether it was resident.
    ///
    /// A fetch already in flight for the same key is unaffected and will
    /// install its (fresher) result when it completes.
    pub async fn invalidate(&self, id: &SummonerId) -> bool {
        let mut inner = self.inner.lock().await;
        let removed = inner.entries.shift_remove(id.key()).is_some();
        if removed {
            self.rebuild_overall(&inner).await;
            debug!(summoner = %id.key(), "invalidated cached summoner");
        }
        removed
    }

    /// Resident entries, least recently used first.
    pub async fn snapshot(&self) -> Vec<(SummonerKey, Arc<SummonerStatistic>)> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .map(|(key, stat)| (key.clone(), stat.clone()))
            .collect()
    }

    /// Number of resident entries.
    pub async fn resident(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// The overall aggregate as of the last completed rebuild.
    pub async fn overall(&self) -> OverallAggregate {
        self.overall.read().await.clone()
    }

    /// Point-in-time counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }

    /// Fetch, aggregate, install, then publish the outcome to waiters.
    async fn run_fetch(&self, id: SummonerId, tx: watch::Sender<Option<FetchOutcome>>) {
        let outcome = match self.fetch_raw(&id).await {
            Ok(raw) => Ok(Arc::new(calculate::build_statistic(&id, raw, &self.catalog))),
            Err(err) => Err(err),
        };

        {
            let mut inner = self.inner.lock().await;
            inner.in_flight.remove(id.key());

            if let Ok(stat) = &outcome {
                // Evict before inserting so the insert itself never
                // pushes the map over capacity.
                while inner.entries.len() >= self.settings.capacity {
                    match inner.entries.shift_remove_index(0) {
                        Some((evicted, _)) => {
                            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                            debug!(evicted = %evicted, "evicted least recently used summoner");
                        }
                        None => break,
                    }
                }
                inner.entries.insert(id.key().clone(), stat.clone());
                debug_assert!(inner.entries.len() <= self.settings.capacity);

                self.rebuild_overall(&inner).await;
            }
        }

        // Fails only if every waiter was cancelled; the entry is already
        // installed, so that is harmless.
        let _ = tx.send(Some(outcome));
    }

    async fn fetch_raw(&self, id: &SummonerId) -> Result<crate::source::RawSummoner, LookupError> {
        let fetch = self.source.fetch_summoner(id.region(), id.name());
        match tokio::time::timeout(self.settings.fetch_timeout, fetch).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(SourceError::NotFound { name })) => Err(LookupError::NotFound(name)),
            Ok(Err(err)) => {
                warn!(summoner = %id.key(), source = self.source.name(), error = %err, "upstream fetch failed");
                Err(LookupError::FetchFailure(err.to_string()))
            }
            Err(_) => {
                warn!(summoner = %id.key(), source = self.source.name(), "upstream fetch timed out");
                Err(LookupError::FetchFailure(format!(
                    "fetch timed out after {:?}",
                    self.settings.fetch_timeout
                )))
            }
        }
    }

    /// Recompute the overall aggregate from resident entries. Callers
    /// hold the inner lock; lock order is inner, then overall.
    async fn rebuild_overall(&self, inner: &CacheInner) {
        let aggregate = OverallAggregate::rebuild(inner.entries.values().map(|stat| stat.as_ref()));
        *self.overall.write().await = aggregate;
    }
}

/// Await the shared outcome of an in-flight fetch.
async fn wait_shared(rx: &mut watch::Receiver<Option<FetchOutcome>>) -> FetchOutcome {
    loop {
        if let Some(outcome) = rx.borrow_and_update().as_ref() {
            return outcome.clone();
        }
        if rx.changed().await.is_err() {
            // Sender dropped without publishing: the fetch task died.
            return Err(LookupError::FetchFailure(
                "in-flight fetch was abandoned".to_string(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ChampionInfo;
    use crate::models::{ChampionId, Tier};
    use crate::source::{raw_mastery, raw_summoner, MockSource};

    fn test_catalog() -> Arc<ChampionCatalog> {
        let entries = (1..=10)
            .map(|id| ChampionInfo {
                id: ChampionId::new(id),
                key_name: format!("champ{id}"),
                name: format!("Champ {id}"),
                portrait_url: format!("https://cdn.invalid/champ{id}.png"),
            })
            .collect();
        Arc::new(ChampionCatalog::new("6.9.1", entries))
    }

    fn test_settings(capacity: usize) -> CacheSettings {
        CacheSettings {
            capacity,
            fetch_timeout: Duration::from_millis(250),
        }
    }

    fn cache_with(source: Arc<MockSource>, capacity: usize) -> SummonerCache {
        SummonerCache::new(source, test_catalog(), test_settings(capacity))
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache() {
        let source = Arc::new(MockSource::new());
        source.insert(
            Region::Na,
            raw_summoner("Faker", "GOLD", "II", vec![raw_mastery(1, 100, 5, 1, "S")]),
        );
        let cache = cache_with(source.clone(), 8);

        let first = cache.lookup("NA", "Faker").await.unwrap();
        let second = cache.lookup("NA", "Faker").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_calls(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_lookup_rejects_invalid_identity_before_fetching() {
        let source = Arc::new(MockSource::new());
        let cache = cache_with(source.clone(), 8);

        let unknown_region = cache.lookup("XX", "Faker").await;
        assert!(matches!(unknown_region, Err(LookupError::InvalidIdentity(_))));

        let bad_name = cache.lookup("NA", "no/slash").await;
        assert!(matches!(bad_name, Err(LookupError::InvalidIdentity(_))));

        assert_eq!(source.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_summoner_is_not_negative_cached() {
        let source = Arc::new(MockSource::new());
        let cache = cache_with(source.clone(), 8);

        let missing = cache.lookup("NA", "Nobody").await;
        assert!(matches!(missing, Err(LookupError::NotFound(_))));
        assert_eq!(cache.resident().await, 0);

        // The player appears upstream; the next lookup refetches.
        source.insert(Region::Na, raw_summoner("Nobody", "null", "null", vec![]));
        let found = cache.lookup("NA", "Nobody").await;
        assert!(found.is_ok());
        assert_eq!(source.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_and_is_not_cached() {
        let source = Arc::new(MockSource::new());
        source.insert(Region::Na, raw_summoner("Faker", "GOLD", "II", vec![]));
        source.fail_next(1);
        let cache = cache_with(source.clone(), 8);

        let failed = cache.lookup("NA", "Faker").await;
        assert!(matches!(failed, Err(LookupError::FetchFailure(_))));
        assert_eq!(cache.resident().await, 0);

        let ok = cache.lookup("NA", "Faker").await.unwrap();
        assert_eq!(ok.tier, Tier::Gold);
        assert_eq!(source.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_capacity_eviction_drops_least_recent() {
        let source = Arc::new(MockSource::new());
        for name in ["One", "Two", "Three"] {
            source.insert(Region::Na, raw_summoner(name, "null", "null", vec![]));
        }
        let cache = cache_with(source.clone(), 2);

        cache.lookup("NA", "One").await.unwrap();
        cache.lookup("NA", "Two").await.unwrap();
        cache.lookup("NA", "Three").await.unwrap();

        assert_eq!(cache.resident().await, 2);
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.overall().await.player_count(), 2);

        let keys: Vec<String> = cache
            .snapshot()
            .await
            .iter()
            .map(|(key, _)| key.to_string())
            .collect();
        assert_eq!(keys, vec!["two-na", "three-na"]);

        // The evicted identity is gone for real: looking it up refetches.
        cache.lookup("NA", "One").await.unwrap();
        assert_eq!(source.fetch_calls(), 4);
    }

    #[tokio::test]
    async fn test_hit_refreshes_recency() {
        let source = Arc::new(MockSource::new());
        for name in ["One", "Two", "Three"] {
            source.insert(Region::Na, raw_summoner(name, "null", "null", vec![]));
        }
        let cache = cache_with(source.clone(), 2);

        cache.lookup("NA", "One").await.unwrap();
        cache.lookup("NA", "Two").await.unwrap();
        // Touch "One" so "Two" becomes the eviction candidate.
        cache.lookup("NA", "One").await.unwrap();
        cache.lookup("NA", "Three").await.unwrap();

        let keys: Vec<String> = cache
            .snapshot()
            .await
            .iter()
            .map(|(key, _)| key.to_string())
            .collect();
        assert_eq!(keys, vec!["one-na", "three-na"]);
        assert_eq!(source.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_coalesce_into_one_fetch() {
        let source = Arc::new(MockSource::new().with_delay(Duration::from_millis(50)));
        source.insert(Region::Na, raw_summoner("Faker", "GOLD", "II", vec![]));
        let cache = cache_with(source.clone(), 8);

        let (a, b) = tokio::join!(cache.lookup("NA", "Faker"), cache.lookup("NA", "Faker"));

        let a = a.unwrap();
        let b = b.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(source.fetch_calls(), 1);
        assert_eq!(cache.stats().coalesced, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_abort_shared_fetch() {
        let source = Arc::new(MockSource::new().with_delay(Duration::from_millis(50)));
        source.insert(Region::Na, raw_summoner("Faker", "GOLD", "II", vec![]));
        let cache = cache_with(source.clone(), 8);

        let doomed = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.lookup("NA", "Faker").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        doomed.abort();

        let survivor = cache.lookup("NA", "Faker").await.unwrap();
        assert_eq!(survivor.id.name(), "Faker");
        assert_eq!(source.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_slow_fetch_times_out_and_caches_nothing() {
        let source = Arc::new(MockSource::new().with_delay(Duration::from_millis(200)));
        source.insert(Region::Na, raw_summoner("Faker", "GOLD", "II", vec![]));
        let settings = CacheSettings {
            capacity: 8,
            fetch_timeout: Duration::from_millis(50),
        };
        let cache = SummonerCache::new(source.clone(), test_catalog(), settings);

        let result = cache.lookup("NA", "Faker").await;
        assert!(matches!(result, Err(LookupError::FetchFailure(_))));
        assert_eq!(cache.resident().await, 0);
    }

    #[tokio::test]
    async fn test_overall_aggregate_follows_membership() {
        let source = Arc::new(MockSource::new());
        source.insert(Region::Na, raw_summoner("Alpha", "GOLD", "II", vec![]));
        source.insert(Region::Kr, raw_summoner("Beta", "CHALLENGER", "I", vec![]));
        let cache = cache_with(source.clone(), 8);

        cache.lookup("NA", "Alpha").await.unwrap();
        cache.lookup("KR", "Beta").await.unwrap();

        let overall = cache.overall().await;
        assert_eq!(overall.player_count(), 2);
        assert_eq!(overall.summoner_counts().get(&Region::Na), Some(&1));
        assert_eq!(
            overall
                .tier_counts(Region::Kr)
                .and_then(|tiers| tiers.get(&Tier::Challenger)),
            Some(&1)
        );

        let id = SummonerId::new(Region::Na, "Alpha").unwrap();
        assert!(cache.invalidate(&id).await);

        let overall = cache.overall().await;
        assert_eq!(overall.player_count(), 1);
        assert!(overall.tier_counts(Region::Na).is_none());

        // Invalidating an absent entry is a no-op.
        assert!(!cache.invalidate(&id).await);
    }
}
