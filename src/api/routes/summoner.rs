use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate;
use crate::models::{Region, SummonerId, SummonerView, Tier};

/// Response header on DELETE reporting whether the entry was resident.
pub const WAS_CACHED_HEADER: &str = "x-was-cached";

#[derive(Debug, Serialize)]
pub struct SummonerResponse {
    pub name: String,
    pub region: Region,
    pub summoner_level: u32,
    pub profile_icon_url: String,
    pub mastery_score: u32,
    pub tier: Tier,
    pub division: Option<String>,
    pub total_points: u64,
    pub fetched_at: DateTime<Utc>,
    pub view: SummonerView,
}

/// Look up one summoner, serving from cache when resident.
pub async fn get_summoner(
    State(state): State<AppState>,
    Path((region, name)): Path<(String, String)>,
) -> Result<Json<SummonerResponse>, ApiError> {
    let stat = state.cache.lookup(&region, &name).await?;
    let view = calculate::build_view(&stat, &state.catalog);

    Ok(Json(SummonerResponse {
        name: stat.id.name().to_string(),
        region: stat.id.region(),
        summoner_level: stat.summoner_level,
        profile_icon_url: state.catalog.profile_icon_url(stat.profile_icon_id),
        mastery_score: stat.mastery_score,
        tier: stat.tier,
        division: stat.division.clone(),
        total_points: stat.total_points(),
        fetched_at: stat.fetched_at,
        view,
    }))
}

/// Drop a summoner from the cache. Always 204; the `x-was-cached`
/// header reports whether anything was actually removed.
pub async fn invalidate_summoner(
    State(state): State<AppState>,
    Path((region, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let region = region
        .parse::<Region>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let id = SummonerId::new(region, &name).map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let was_cached = state.cache.invalidate(&id).await;
    let flag = if was_cached { "true" } else { "false" };
    Ok((StatusCode::NO_CONTENT, [(WAS_CACHED_HEADER, flag)]).into_response())
}
