//! Game shard regions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a region string matches no known shard.
#[derive(Debug, Clone, Error)]
#[error("unknown region: {0}")]
pub struct UnknownRegion(pub String);

/// A known game shard.
///
/// Regions key the overall aggregate and form part of every cache key,
/// so the set is closed: an unknown shard string is rejected at the
/// identity boundary rather than carried through the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Br,
    Eune,
    Euw,
    Jp,
    Kr,
    Lan,
    Las,
    Na,
    Oce,
    Ru,
    Tr,
}

impl Region {
    /// All known shards, in canonical order.
    pub fn all() -> &'static [Region] {
        &[
            Region::Br,
            Region::Eune,
            Region::Euw,
            Region::Jp,
            Region::Kr,
            Region::Lan,
            Region::Las,
            Region::Na,
            Region::Oce,
            Region::Ru,
            Region::Tr,
        ]
    }

    /// Lowercase shard identifier used in API hostnames and cache keys.
    pub fn shard(&self) -> &'static str {
        match self {
            Region::Br => "br",
            Region::Eune => "eune",
            Region::Euw => "euw",
            Region::Jp => "jp",
            Region::Kr => "kr",
            Region::Lan => "lan",
            Region::Las => "las",
            Region::Na => "na",
            Region::Oce => "oce",
            Region::Ru => "ru",
            Region::Tr => "tr",
        }
    }

    /// Platform identifier used by the champion-mastery endpoints.
    pub fn platform_id(&self) -> &'static str {
        match self {
            Region::Br => "BR1",
            Region::Eune => "EUN1",
            Region::Euw => "EUW1",
            Region::Jp => "JP1",
            Region::Kr => "KR",
            Region::Lan => "LA1",
            Region::Las => "LA2",
            Region::Na => "NA1",
            Region::Oce => "OC1",
            Region::Ru => "RU",
            Region::Tr => "TR1",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shard().to_uppercase())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "br" => Ok(Region::Br),
            "eune" => Ok(Region::Eune),
            "euw" => Ok(Region::Euw),
            "jp" => Ok(Region::Jp),
            "kr" => Ok(Region::Kr),
            "lan" => Ok(Region::Lan),
            "las" => Ok(Region::Las),
            "na" => Ok(Region::Na),
            "oce" => Ok(Region::Oce),
            "ru" => Ok(Region::Ru),
            "tr" => Ok(Region::Tr),
            _ => Err(UnknownRegion(s.to_string())),
        }
    }
}
