//! Typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric champion identifier assigned by the game-data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChampionId(i64);

impl ChampionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChampionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChampionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Cache key for a summoner: normalized name plus region suffix.
///
/// Unique per (region, normalized name); derivation lives in
/// [`super::SummonerId`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummonerKey(String);

impl SummonerKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SummonerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SummonerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SummonerKey({})", self.0)
    }
}

impl From<String> for SummonerKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for SummonerKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
