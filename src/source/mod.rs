//! Outbound game-data boundary.
//!
//! The cache reaches the outside world only through [`SummonerSource`].
//! Implementations:
//! - [`RiotSource`]: the real game-data service (riot.rs)
//! - [`MockSource`]: canned responses for tests, with a call counter
//!
//! Static champion data is loaded separately, once at startup, by
//! [`DataDragonClient`] (ddragon.rs).

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Region;

pub mod ddragon;
pub mod riot;

pub use ddragon::DataDragonClient;
pub use riot::RiotSource;

/// Errors from the game-data boundary.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("summoner not found: {name}")]
    NotFound { name: String },

    #[error("rate limited by upstream (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("upstream returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected upstream payload: {0}")]
    InvalidResponse(String),
}

/// One raw mastery entry as delivered by the collaborator.
///
/// Values arrive untyped; the aggregator owns conversion and clamping.
#[derive(Debug, Clone)]
pub struct RawMastery {
    pub champion_id: i64,
    pub champion_points: i64,
    pub champion_level: i64,

    /// 0 = chest not granted, anything greater = granted this season.
    pub chest_granted: i64,

    /// Grade string, or the literal `"null"` until the first graded game.
    pub highest_grade: String,
}

/// Raw summoner payload: profile fields plus the mastery list in
/// upstream order. Mastery order matters downstream (top-N tie-breaks).
#[derive(Debug, Clone)]
pub struct RawSummoner {
    pub summoner_id: i64,
    pub name: String,
    pub profile_icon_id: i32,
    pub summoner_level: i64,
    pub mastery_score: i64,

    /// Tier name, or the literal `"null"` when unranked.
    pub tier: String,

    /// Division within the tier, or the literal `"null"`.
    pub division: String,

    pub masteries: Vec<RawMastery>,
}

/// The external fetch collaborator.
#[async_trait]
pub trait SummonerSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Fetch one summoner's raw profile and mastery data.
    async fn fetch_summoner(&self, region: Region, name: &str) -> Result<RawSummoner, SourceError>;
}

#[cfg(test)]
pub fn raw_mastery(champion_id: i64, points: i64, level: i64, chest: i64, grade: &str) -> RawMastery {
    RawMastery {
        champion_id,
        champion_points: points,
        champion_level: level,
        chest_granted: chest,
        highest_grade: grade.to_string(),
    }
}

#[cfg(test)]
pub fn raw_summoner(name: &str, tier: &str, division: &str, masteries: Vec<RawMastery>) -> RawSummoner {
    RawSummoner {
        summoner_id: 42,
        name: name.to_string(),
        profile_icon_id: 588,
        summoner_level: 30,
        mastery_score: 100,
        tier: tier.to_string(),
        division: division.to_string(),
        masteries,
    }
}

/// Canned summoner source for tests.
///
/// Counts every `fetch_summoner` call so tests can assert on cache hits
/// and coalescing, and can inject latency or failures.
#[cfg(test)]
pub struct MockSource {
    summoners: std::sync::Mutex<std::collections::HashMap<(Region, String), RawSummoner>>,
    calls: std::sync::atomic::AtomicUsize,
    delay: Option<std::time::Duration>,
    fail_next: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockSource {
    pub fn new() -> Self {
        Self {
            summoners: std::sync::Mutex::new(std::collections::HashMap::new()),
            calls: std::sync::atomic::AtomicUsize::new(0),
            delay: None,
            fail_next: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every fetch (coalescing/timeout tests).
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn insert(&self, region: Region, raw: RawSummoner) {
        let key = (region, raw.name.to_lowercase());
        self.summoners.lock().unwrap().insert(key, raw);
    }

    /// Fail the next `n` fetches with an upstream 503.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, std::sync::atomic::Ordering::SeqCst);
    }

    /// Total `fetch_summoner` invocations so far.
    pub fn fetch_calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl SummonerSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_summoner(&self, region: Region, name: &str) -> Result<RawSummoner, SourceError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let remaining = self.fail_next.load(std::sync::atomic::Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next
                .store(remaining - 1, std::sync::atomic::Ordering::SeqCst);
            return Err(SourceError::HttpStatus { status: 503 });
        }

        self.summoners
            .lock()
            .unwrap()
            .get(&(region, name.to_lowercase()))
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_canned_summoner() {
        let source = MockSource::new();
        source.insert(
            Region::Na,
            raw_summoner("Faker", "GOLD", "II", vec![raw_mastery(1, 100, 4, 0, "S")]),
        );

        let raw = source.fetch_summoner(Region::Na, "Faker").await.unwrap();
        assert_eq!(raw.name, "Faker");
        assert_eq!(raw.masteries.len(), 1);
        assert_eq!(source.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_unknown_name_is_not_found() {
        let source = MockSource::new();
        let err = source.fetch_summoner(Region::Na, "nobody").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mock_forced_failures_then_recovery() {
        let source = MockSource::new();
        source.insert(Region::Na, raw_summoner("Faker", "null", "null", vec![]));
        source.fail_next(1);

        let err = source.fetch_summoner(Region::Na, "Faker").await.unwrap_err();
        assert!(matches!(err, SourceError::HttpStatus { status: 503 }));

        let raw = source.fetch_summoner(Region::Na, "Faker").await.unwrap();
        assert_eq!(raw.name, "Faker");
        assert_eq!(source.fetch_calls(), 2);
    }
}
