//! Ranked tier ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RAW_NULL_SENTINEL;

/// Error returned when a tier string matches no rank-table entry.
#[derive(Debug, Clone, Error)]
#[error("unknown tier: {0}")]
pub struct UnknownTier(pub String);

/// Ranked tier, ordered best to worst.
///
/// The derived `Ord` follows the declaration order, so `Challenger` is
/// the minimum and `Unranked` the maximum. Lexical order is wrong for
/// this domain (Bronze would sort before Challenger) which is why the
/// rank table is an enum rather than a string.
///
/// The upstream `"null"` sentinel for players without a ranked entry
/// parses as `Unranked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Challenger,
    Master,
    Diamond,
    Platinum,
    Gold,
    Silver,
    Bronze,
    Unranked,
}

impl Tier {
    /// All tiers, best first.
    pub fn all() -> &'static [Tier] {
        &[
            Tier::Challenger,
            Tier::Master,
            Tier::Diamond,
            Tier::Platinum,
            Tier::Gold,
            Tier::Silver,
            Tier::Bronze,
            Tier::Unranked,
        ]
    }

    /// Whether the player holds a ranked position at all.
    pub fn is_ranked(&self) -> bool {
        !matches!(self, Tier::Unranked)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Challenger => "Challenger",
            Tier::Master => "Master",
            Tier::Diamond => "Diamond",
            Tier::Platinum => "Platinum",
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Bronze => "Bronze",
            Tier::Unranked => "Unranked",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "challenger" => Ok(Tier::Challenger),
            "master" => Ok(Tier::Master),
            "diamond" => Ok(Tier::Diamond),
            "platinum" => Ok(Tier::Platinum),
            "gold" => Ok(Tier::Gold),
            "silver" => Ok(Tier::Silver),
            "bronze" => Ok(Tier::Bronze),
            "unranked" | RAW_NULL_SENTINEL => Ok(Tier::Unranked),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}
