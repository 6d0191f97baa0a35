//! Summoner identity and derived statistic models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::{ChampionId, Grade, Region, SummonerKey, Tier};

/// Longest summoner name the game-data service accepts.
const MAX_NAME_CHARS: usize = 16;

/// Reasons an identity is rejected before any fetch or cache access.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("summoner name is empty")]
    EmptyName,

    #[error("summoner name is longer than {MAX_NAME_CHARS} characters: {0:?}")]
    NameTooLong(String),

    #[error("summoner name contains invalid characters: {0:?}")]
    InvalidCharacters(String),

    #[error("summoner name normalizes to an empty key: {0:?}")]
    UnusableName(String),
}

/// A validated summoner identity.
///
/// Construction derives the cache key: the name lowercased with
/// everything but alphanumerics stripped, suffixed with the region
/// shard. "Hide on Bush" on KR keys as `hideonbush-kr`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SummonerId {
    region: Region,
    name: String,
    key: SummonerKey,
}

impl SummonerId {
    /// Validate a display name and derive the cache key.
    pub fn new(region: Region, name: &str) -> Result<Self, IdentityError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(IdentityError::NameTooLong(name.to_string()));
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_'))
        {
            return Err(IdentityError::InvalidCharacters(name.to_string()));
        }

        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        if normalized.is_empty() {
            return Err(IdentityError::UnusableName(name.to_string()));
        }

        let key = SummonerKey::from(format!("{}-{}", normalized, region.shard()));
        Ok(Self {
            region,
            name: name.to_string(),
            key,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// The display name as entered (trimmed, original casing).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &SummonerKey {
        &self.key
    }
}

impl std::fmt::Display for SummonerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.region)
    }
}

/// A per-champion mastery record, typed and catalog-filtered.
#[derive(Debug, Clone, Serialize)]
pub struct ChampionMastery {
    pub champion_id: ChampionId,

    /// Lifetime mastery points on this champion.
    pub points: u32,

    /// Mastery level, within [`Self::MIN_LEVEL`]..=[`Self::MAX_LEVEL`].
    pub level: u8,

    /// Whether the once-per-season chest was already granted.
    pub chest_granted: bool,

    /// Best performance grade; `None` until the first graded game.
    pub highest_grade: Option<Grade>,
}

impl ChampionMastery {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 7;
}

/// Derived per-summoner statistic, owned by the cache.
///
/// Immutable once built; a refresh replaces the whole value rather than
/// mutating in place, so concurrent readers can hold on to a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SummonerStatistic {
    pub id: SummonerId,
    pub summoner_level: u32,
    pub profile_icon_id: i32,
    pub mastery_score: u32,
    pub tier: Tier,

    /// Division within the tier ("I".."V"); `None` when unranked.
    pub division: Option<String>,

    /// Mastery records in upstream order. Top-N tie-breaks rely on this
    /// order staying untouched.
    pub masteries: Vec<ChampionMastery>,

    pub fetched_at: DateTime<Utc>,
}

impl SummonerStatistic {
    /// Sum of mastery points across all champions.
    pub fn total_points(&self) -> u64 {
        self.masteries.iter().map(|m| u64::from(m.points)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_strips_and_lowercases() {
        let id = SummonerId::new(Region::Kr, "Hide on Bush").unwrap();
        assert_eq!(id.key().as_str(), "hideonbush-kr");
        assert_eq!(id.name(), "Hide on Bush");
        assert_eq!(id.region(), Region::Kr);
    }

    #[test]
    fn test_same_key_for_spacing_variants() {
        let a = SummonerId::new(Region::Na, "Faker").unwrap();
        let b = SummonerId::new(Region::Na, " fa ker ").unwrap();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_region_distinguishes_keys() {
        let na = SummonerId::new(Region::Na, "Faker").unwrap();
        let kr = SummonerId::new(Region::Kr, "Faker").unwrap();
        assert_ne!(na.key(), kr.key());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            SummonerId::new(Region::Na, "   "),
            Err(IdentityError::EmptyName)
        ));
    }

    #[test]
    fn test_overlong_name_rejected() {
        let err = SummonerId::new(Region::Na, "abcdefghijklmnopq").unwrap_err();
        assert!(matches!(err, IdentityError::NameTooLong(_)));
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(matches!(
            SummonerId::new(Region::Na, "fa\tker"),
            Err(IdentityError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn test_punctuation_only_name_rejected() {
        assert!(matches!(
            SummonerId::new(Region::Na, "._."),
            Err(IdentityError::UnusableName(_))
        ));
    }

    #[test]
    fn test_unicode_names_allowed() {
        let id = SummonerId::new(Region::Kr, "페이커").unwrap();
        assert_eq!(id.key().as_str(), "페이커-kr");
    }

    #[test]
    fn test_total_points() {
        let stat = SummonerStatistic {
            id: SummonerId::new(Region::Na, "Faker").unwrap(),
            summoner_level: 30,
            profile_icon_id: 588,
            mastery_score: 120,
            tier: Tier::Gold,
            division: Some("II".to_string()),
            masteries: vec![
                ChampionMastery {
                    champion_id: ChampionId::new(1),
                    points: 1000,
                    level: 4,
                    chest_granted: false,
                    highest_grade: None,
                },
                ChampionMastery {
                    champion_id: ChampionId::new(2),
                    points: 234,
                    level: 2,
                    chest_granted: true,
                    highest_grade: "S".parse().ok(),
                },
            ],
            fetched_at: Utc::now(),
        };
        assert_eq!(stat.total_points(), 1234);
    }
}
