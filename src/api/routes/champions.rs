use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::catalog::ChampionInfo;

#[derive(Debug, Serialize)]
pub struct ChampionListResponse {
    pub version: String,
    pub count: usize,
    pub champions: Vec<ChampionInfo>,
}

/// Full champion catalog.
pub async fn list_champions(State(state): State<AppState>) -> Json<ChampionListResponse> {
    let champions: Vec<ChampionInfo> = state.catalog.iter().cloned().collect();

    Json(ChampionListResponse {
        version: state.catalog.version().to_string(),
        count: champions.len(),
        champions,
    })
}

/// One catalog entry by key name, case-insensitive.
pub async fn get_champion(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ChampionInfo>, ApiError> {
    state
        .catalog
        .by_key_name(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Champion not found: {}", key)))
}
