//! Statistics shaping engine.
//!
//! Two pure transformations sit between the upstream source and the API:
//! - Raw payload to typed [`SummonerStatistic`] (sanitizing conversion)
//! - [`SummonerStatistic`] to [`SummonerView`] (presentation aggregates)
//!
//! Sanitizing is clamp-and-log: a malformed upstream field never fails
//! the whole lookup, it degrades to the nearest valid value.

use tracing::{debug, warn};

use crate::catalog::ChampionCatalog;
use crate::models::{
    ChampionId, ChampionMastery, ChestCounts, Grade, GradeHistogram, LevelHistogram, SummonerId,
    SummonerStatistic, SummonerView, Tier, TopSlot, RAW_NULL_SENTINEL, TOP_CHAMPION_SLOTS,
    TOP_CHESTLESS_SLOTS,
};
use crate::source::{RawMastery, RawSummoner};

/// Convert a raw upstream payload into a typed statistic.
///
/// Masteries for champions missing from the catalog are dropped; the
/// remaining entries keep their upstream order. Unknown tiers fall back
/// to unranked, unparseable grades clamp to the lowest grade, negative
/// counts clamp to zero, and mastery levels clamp into the valid range.
pub fn build_statistic(
    id: &SummonerId,
    raw: RawSummoner,
    catalog: &ChampionCatalog,
) -> SummonerStatistic {
    let tier = parse_tier(id, &raw.tier);
    let division = parse_division(raw.division);

    let mut masteries = Vec::with_capacity(raw.masteries.len());
    for entry in raw.masteries {
        let champion_id = ChampionId::new(entry.champion_id);
        if catalog.by_id(champion_id).is_none() {
            debug!(summoner = %id.key(), champion = %champion_id, "dropping mastery for uncataloged champion");
            continue;
        }
        masteries.push(sanitize_mastery(id, champion_id, entry));
    }

    SummonerStatistic {
        id: id.clone(),
        summoner_level: clamp_count(id, "summonerLevel", raw.summoner_level),
        profile_icon_id: raw.profile_icon_id,
        mastery_score: clamp_count(id, "masteryScore", raw.mastery_score),
        tier,
        division,
        masteries,
        fetched_at: chrono::Utc::now(),
    }
}

/// Shape a statistic into the presentation aggregates the API serves.
pub fn build_view(stat: &SummonerStatistic, catalog: &ChampionCatalog) -> SummonerView {
    // Stable sort: upstream order breaks point ties.
    let mut ranked: Vec<&ChampionMastery> = stat.masteries.iter().collect();
    ranked.sort_by(|a, b| b.points.cmp(&a.points));

    let chestless: Vec<&ChampionMastery> = ranked
        .iter()
        .copied()
        .filter(|m| !m.chest_granted)
        .collect();

    SummonerView {
        top_champions: top_slots(&ranked, TOP_CHAMPION_SLOTS, catalog),
        top_chestless: top_slots(&chestless, TOP_CHESTLESS_SLOTS, catalog),
        levels: level_histogram(&stat.masteries),
        grades: grade_histogram(&stat.masteries),
        chests: chest_counts(stat, catalog),
        total_points: stat.total_points(),
    }
}

fn parse_tier(id: &SummonerId, raw: &str) -> Tier {
    match raw.parse() {
        Ok(tier) => tier,
        Err(_) => {
            warn!(summoner = %id.key(), tier = raw, "unknown tier from upstream, treating as unranked");
            Tier::Unranked
        }
    }
}

fn parse_division(raw: String) -> Option<String> {
    if raw.is_empty() || raw == RAW_NULL_SENTINEL {
        None
    } else {
        Some(raw)
    }
}

fn parse_grade(id: &SummonerId, champion: ChampionId, raw: &str) -> Option<Grade> {
    if raw.is_empty() || raw == RAW_NULL_SENTINEL {
        return None;
    }
    match raw.parse() {
        Ok(grade) => Some(grade),
        Err(_) => {
            warn!(summoner = %id.key(), champion = %champion, grade = raw, "unparseable grade from upstream, clamping to lowest");
            Some(Grade::lowest())
        }
    }
}

/// Clamp a count field that must be non-negative.
fn clamp_count(id: &SummonerId, field: &str, value: i64) -> u32 {
    if value < 0 {
        warn!(summoner = %id.key(), field, value, "negative count from upstream, clamping to 0");
        return 0;
    }
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn sanitize_mastery(id: &SummonerId, champion_id: ChampionId, raw: RawMastery) -> ChampionMastery {
    let clamped_level = raw.champion_level.clamp(
        i64::from(ChampionMastery::MIN_LEVEL),
        i64::from(ChampionMastery::MAX_LEVEL),
    );
    if clamped_level != raw.champion_level {
        warn!(summoner = %id.key(), champion = %champion_id, level = raw.champion_level, "mastery level out of range, clamping");
    }

    ChampionMastery {
        champion_id,
        points: clamp_count(id, "championPoints", raw.champion_points),
        level: clamped_level as u8,
        chest_granted: raw.chest_granted != 0,
        highest_grade: parse_grade(id, champion_id, &raw.highest_grade),
    }
}

/// Take the first `slots` masteries as ranking entries, padding the
/// tail with placeholders so the slot count is constant.
fn top_slots(ranked: &[&ChampionMastery], slots: usize, catalog: &ChampionCatalog) -> Vec<TopSlot> {
    let mut out = Vec::with_capacity(slots);
    for mastery in ranked.iter().take(slots) {
        // Masteries without a catalog entry were dropped at build time.
        let info = match catalog.by_id(mastery.champion_id) {
            Some(info) => info,
            None => continue,
        };
        out.push(TopSlot::Champion {
            champion_id: mastery.champion_id,
            name: info.name.clone(),
            key_name: info.key_name.clone(),
            portrait_url: info.portrait_url.clone(),
            points: mastery.points,
            level: mastery.level,
        });
    }
    while out.len() < slots {
        out.push(TopSlot::Empty);
    }
    out
}

/// Champion counts per mastery level, zero-filled across the valid
/// range so every bucket is present even for an empty mastery list.
fn level_histogram(masteries: &[ChampionMastery]) -> LevelHistogram {
    let mut levels = LevelHistogram::new();
    for level in ChampionMastery::MIN_LEVEL..=ChampionMastery::MAX_LEVEL {
        levels.insert(level, 0);
    }
    for mastery in masteries {
        *levels.entry(mastery.level).or_insert(0) += 1;
    }
    levels
}

fn grade_histogram(masteries: &[ChampionMastery]) -> GradeHistogram {
    let mut grades = GradeHistogram::zeroed();
    for mastery in masteries {
        if let Some(grade) = mastery.highest_grade {
            grades.increment(grade);
        }
    }
    grades
}

fn chest_counts(stat: &SummonerStatistic, catalog: &ChampionCatalog) -> ChestCounts {
    let played = stat.masteries.len() as u32;
    let granted = stat.masteries.iter().filter(|m| m.chest_granted).count() as u32;
    let total = catalog.len() as u32;
    if played > total {
        warn!(summoner = %stat.id.key(), played, total, "more masteries than cataloged champions");
    }

    ChestCounts {
        chests_granted: granted,
        chests_not_granted: played - granted,
        champions_played: played,
        champions_not_played: total.saturating_sub(played),
        champions_total: total,
    }
}
