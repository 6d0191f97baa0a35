//! Riot API summoner source.
//!
//! Talks to the legacy region-sharded endpoints: summoner-by-name
//! (v1.4), the champion-mastery list and score (platform addressed),
//! and the ranked league entry (v2.5). One `fetch_summoner` call fans
//! out to all four and assembles a [`RawSummoner`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{RawMastery, RawSummoner, SourceError, SummonerSource};
use crate::models::{Region, RAW_NULL_SENTINEL};

const SOLO_QUEUE: &str = "RANKED_SOLO_5x5";

/// Game-data client backed by the Riot API.
pub struct RiotSource {
    client: reqwest::Client,
    api_key: String,
}

impl RiotSource {
    pub fn new(api_key: String, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_key }
    }

    fn region_url(region: Region, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = Url::parse(&format!("https://{}.api.riotgames.com", region.shard()))
            .map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl("host cannot carry a path".to_string()))?
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(SourceError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn fetch_profile(&self, region: Region, name: &str) -> Result<SummonerDto, SourceError> {
        let url = Self::region_url(
            region,
            &["api", "lol", region.shard(), "v1.4", "summoner", "by-name", name],
        )?;
        // The endpoint answers with a map keyed by normalized name; a
        // single-name request yields at most one entry.
        match self.get_json::<HashMap<String, SummonerDto>>(url).await {
            Ok(map) => map.into_values().next().ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            }),
            Err(SourceError::HttpStatus { status: 404 }) => Err(SourceError::NotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn fetch_masteries(
        &self,
        region: Region,
        summoner_id: i64,
    ) -> Result<Vec<ChampionMasteryDto>, SourceError> {
        let id = summoner_id.to_string();
        let url = Self::region_url(
            region,
            &[
                "championmastery",
                "location",
                region.platform_id(),
                "player",
                id.as_str(),
                "champions",
            ],
        )?;
        self.get_json(url).await
    }

    async fn fetch_mastery_score(
        &self,
        region: Region,
        summoner_id: i64,
    ) -> Result<i64, SourceError> {
        let id = summoner_id.to_string();
        let url = Self::region_url(
            region,
            &[
                "championmastery",
                "location",
                region.platform_id(),
                "player",
                id.as_str(),
                "score",
            ],
        )?;
        self.get_json(url).await
    }

    /// Solo-queue tier and division; a 404 means unranked and maps to
    /// the upstream null sentinel.
    async fn fetch_ranked_entry(
        &self,
        region: Region,
        summoner_id: i64,
    ) -> Result<(String, String), SourceError> {
        let id = summoner_id.to_string();
        let url = Self::region_url(
            region,
            &[
                "api",
                "lol",
                region.shard(),
                "v2.5",
                "league",
                "by-summoner",
                id.as_str(),
                "entry",
            ],
        )?;

        let unranked = || (RAW_NULL_SENTINEL.to_string(), RAW_NULL_SENTINEL.to_string());
        match self.get_json::<HashMap<String, Vec<LeagueDto>>>(url).await {
            Ok(map) => {
                let leagues = map.into_values().next().unwrap_or_default();
                let league = leagues
                    .iter()
                    .find(|l| l.queue == SOLO_QUEUE)
                    .or_else(|| leagues.first());
                Ok(match league {
                    Some(league) => {
                        let division = league
                            .entries
                            .first()
                            .map(|e| e.division.clone())
                            .unwrap_or_else(|| RAW_NULL_SENTINEL.to_string());
                        (league.tier.clone(), division)
                    }
                    None => unranked(),
                })
            }
            Err(SourceError::HttpStatus { status: 404 }) => Ok(unranked()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SummonerSource for RiotSource {
    fn name(&self) -> &'static str {
        "riot"
    }

    async fn fetch_summoner(&self, region: Region, name: &str) -> Result<RawSummoner, SourceError> {
        let profile = self.fetch_profile(region, name).await?;
        let masteries = self.fetch_masteries(region, profile.id).await?;
        let mastery_score = self.fetch_mastery_score(region, profile.id).await?;
        let (tier, division) = self.fetch_ranked_entry(region, profile.id).await?;

        debug!(
            region = %region,
            name = %profile.name,
            masteries = masteries.len(),
            "fetched summoner from riot"
        );

        Ok(RawSummoner {
            summoner_id: profile.id,
            name: profile.name,
            profile_icon_id: profile.profile_icon_id,
            summoner_level: profile.summoner_level,
            mastery_score,
            tier,
            division,
            masteries: masteries.into_iter().map(RawMastery::from).collect(),
        })
    }
}

/// Summoner endpoint response entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummonerDto {
    id: i64,
    name: String,
    profile_icon_id: i32,
    summoner_level: i64,
}

/// Champion-mastery endpoint response entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChampionMasteryDto {
    champion_id: i64,
    champion_points: i64,
    champion_level: i64,
    #[serde(default)]
    chest_granted: bool,
    #[serde(default = "null_grade")]
    highest_grade: String,
}

fn null_grade() -> String {
    RAW_NULL_SENTINEL.to_string()
}

impl From<ChampionMasteryDto> for RawMastery {
    fn from(dto: ChampionMasteryDto) -> Self {
        RawMastery {
            champion_id: dto.champion_id,
            champion_points: dto.champion_points,
            champion_level: dto.champion_level,
            chest_granted: i64::from(dto.chest_granted),
            highest_grade: dto.highest_grade,
        }
    }
}

/// League endpoint response entry (one per queue).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeagueDto {
    queue: String,
    tier: String,
    entries: Vec<LeagueEntryDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeagueEntryDto {
    division: String,
}
