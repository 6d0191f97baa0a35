//! Process-wide rollup across all cached summoners.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Region, SummonerStatistic, Tier};

/// Summoner counts per region and per region×tier.
///
/// Always rebuilt from a full cache snapshot in one pass, never patched
/// incrementally, so it can only ever describe a state the cache
/// actually had. `BTreeMap` keys keep regions in canonical order and
/// tiers in rank order, which is also the order they serialize in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OverallAggregate {
    summoner_counts: BTreeMap<Region, u64>,
    tier_counts: BTreeMap<Region, BTreeMap<Tier, u64>>,
}

impl OverallAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute all counts from a snapshot of cached statistics.
    pub fn rebuild<'a>(snapshot: impl IntoIterator<Item = &'a SummonerStatistic>) -> Self {
        let mut aggregate = Self::new();
        for stat in snapshot {
            let region = stat.id.region();
            *aggregate.summoner_counts.entry(region).or_insert(0) += 1;
            *aggregate
                .tier_counts
                .entry(region)
                .or_default()
                .entry(stat.tier)
                .or_insert(0) += 1;
        }
        aggregate
    }

    /// Summoner count per region.
    pub fn summoner_counts(&self) -> &BTreeMap<Region, u64> {
        &self.summoner_counts
    }

    /// Tier breakdown for one region; `None` if no summoner of that
    /// region is cached.
    pub fn tier_counts(&self, region: Region) -> Option<&BTreeMap<Tier, u64>> {
        self.tier_counts.get(&region)
    }

    /// Total summoners across all regions.
    pub fn player_count(&self) -> u64 {
        self.summoner_counts.values().sum()
    }
}
