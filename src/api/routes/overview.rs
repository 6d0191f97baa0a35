use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::cache::CacheStats;
use crate::models::OverallAggregate;

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub player_count: u64,
    pub resident_entries: usize,
    #[serde(flatten)]
    pub overall: OverallAggregate,
    pub cache: CacheStats,
}

/// Aggregate counts across every cached summoner, plus cache counters.
pub async fn get_overview(State(state): State<AppState>) -> Json<OverviewResponse> {
    let overall = state.cache.overall().await;
    let resident_entries = state.cache.resident().await;

    Json(OverviewResponse {
        player_count: overall.player_count(),
        resident_entries,
        overall,
        cache: state.cache.stats(),
    })
}
