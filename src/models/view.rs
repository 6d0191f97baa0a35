//! On-demand derived view of a summoner statistic.
//!
//! Everything here is computed per request from a [`super::SummonerStatistic`]
//! and a catalog, returned by value, and never cached. Histograms are
//! zero-filled over their full domain so consumers never need existence
//! checks.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ChampionId, Grade, GradeLetter, GradeModifier};

/// Number of slots in the top-champions view.
pub const TOP_CHAMPION_SLOTS: usize = 3;

/// Number of slots in the chestless top-champions view.
pub const TOP_CHESTLESS_SLOTS: usize = 6;

/// Champion count per mastery level, zero-filled over 1..=7.
pub type LevelHistogram = BTreeMap<u8, u32>;

/// One slot in a top-N ranking.
///
/// Rankings are padded to a fixed slot count; padding is an explicit
/// `Empty` variant so the external contract never contains nulls and
/// callers can tell placeholders from real entries by tag.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopSlot {
    Champion {
        champion_id: ChampionId,
        name: String,
        key_name: String,
        portrait_url: String,
        points: u32,
        level: u8,
    },
    Empty,
}

impl TopSlot {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, TopSlot::Empty)
    }
}

/// Stacked grade counts: one series per modifier, each zero-filled
/// across all five base letters. Sentinel ("no grade yet") records are
/// not represented anywhere in here.
#[derive(Debug, Clone, Serialize)]
pub struct GradeHistogram {
    /// Series in modifier rank order: `+`, plain, `-`.
    pub series: Vec<GradeSeries>,
}

/// Counts for a single modifier across the base letters.
#[derive(Debug, Clone, Serialize)]
pub struct GradeSeries {
    pub modifier: GradeModifier,

    /// Keyed by letter; `BTreeMap` keeps the S..D rank order.
    pub counts: BTreeMap<GradeLetter, u32>,
}

impl GradeHistogram {
    /// A histogram with every (letter, modifier) bucket present at zero.
    pub fn zeroed() -> Self {
        let series = GradeModifier::all()
            .iter()
            .map(|&modifier| GradeSeries {
                modifier,
                counts: GradeLetter::all().iter().map(|&l| (l, 0)).collect(),
            })
            .collect();
        Self { series }
    }

    pub fn increment(&mut self, grade: Grade) {
        for series in &mut self.series {
            if series.modifier == grade.modifier {
                if let Some(count) = series.counts.get_mut(&grade.letter) {
                    *count += 1;
                }
            }
        }
    }

    pub fn count(&self, grade: Grade) -> u32 {
        self.series
            .iter()
            .find(|s| s.modifier == grade.modifier)
            .and_then(|s| s.counts.get(&grade.letter))
            .copied()
            .unwrap_or(0)
    }

    /// Total graded records across all buckets.
    pub fn total(&self) -> u32 {
        self.series
            .iter()
            .map(|s| s.counts.values().sum::<u32>())
            .sum()
    }
}

/// Chest and played/unplayed breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ChestCounts {
    /// Champions whose seasonal chest was already granted.
    pub chests_granted: u32,

    /// Played champions still eligible for a chest.
    pub chests_not_granted: u32,

    /// Mastery records after catalog filtering.
    pub champions_played: u32,

    /// Catalog size minus played, clamped at zero.
    pub champions_not_played: u32,

    /// Total champions in the catalog.
    pub champions_total: u32,
}

/// The full derived view for one summoner.
#[derive(Debug, Clone, Serialize)]
pub struct SummonerView {
    /// Exactly [`TOP_CHAMPION_SLOTS`] entries.
    pub top_champions: Vec<TopSlot>,

    /// Exactly [`TOP_CHESTLESS_SLOTS`] entries, chest-granted excluded.
    pub top_chestless: Vec<TopSlot>,

    pub levels: LevelHistogram,
    pub grades: GradeHistogram,
    pub chests: ChestCounts,

    /// Sum of mastery points across all champions.
    pub total_points: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_histogram_has_all_buckets() {
        let hist = GradeHistogram::zeroed();
        assert_eq!(hist.series.len(), 3);
        for series in &hist.series {
            assert_eq!(series.counts.len(), 5);
            assert!(series.counts.values().all(|&c| c == 0));
        }
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_series_order_is_modifier_rank() {
        let hist = GradeHistogram::zeroed();
        let modifiers: Vec<_> = hist.series.iter().map(|s| s.modifier).collect();
        assert_eq!(
            modifiers,
            vec![GradeModifier::Plus, GradeModifier::Plain, GradeModifier::Minus]
        );
    }

    #[test]
    fn test_increment_and_count() {
        let mut hist = GradeHistogram::zeroed();
        let s_plus: Grade = "S+".parse().unwrap();
        let c: Grade = "C".parse().unwrap();
        hist.increment(s_plus);
        hist.increment(s_plus);
        hist.increment(c);
        assert_eq!(hist.count(s_plus), 2);
        assert_eq!(hist.count(c), 1);
        assert_eq!(hist.count("D-".parse().unwrap()), 0);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_slot_tags_distinguish_padding() {
        let real = TopSlot::Champion {
            champion_id: ChampionId::new(64),
            name: "Lee Sin".to_string(),
            key_name: "leesin".to_string(),
            portrait_url: "http://example.invalid/leesin.png".to_string(),
            points: 1000,
            level: 5,
        };
        let json = serde_json::to_value(&real).unwrap();
        assert_eq!(json["kind"], "champion");
        assert!(!real.is_placeholder());

        let empty = TopSlot::Empty;
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["kind"], "empty");
        assert!(empty.is_placeholder());
    }
}
