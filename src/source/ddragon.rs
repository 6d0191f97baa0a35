//! Data Dragon static-data client.
//!
//! Loads the champion catalog once at process start. Data Dragon keys
//! champions by display key ("Aatrox") and carries the numeric id as a
//! string in `key`; the catalog wants the numeric id, a lowercase key
//! name, and a prebuilt portrait URL.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use super::SourceError;
use crate::catalog::{ChampionCatalog, ChampionInfo, DDRAGON_CDN};
use crate::models::ChampionId;

const VERSIONS_URL: &str = "https://ddragon.leagueoflegends.com/api/versions.json";

/// Static-data loader for the champion catalog.
pub struct DataDragonClient {
    client: reqwest::Client,
    version_pin: Option<String>,
}

impl DataDragonClient {
    pub fn new(timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            version_pin: None,
        }
    }

    /// Pin a static-data version instead of resolving the latest.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version_pin = Some(version.into());
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: response.status().as_u16(),
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn resolve_version(&self) -> Result<String, SourceError> {
        if let Some(version) = &self.version_pin {
            return Ok(version.clone());
        }
        let url =
            Url::parse(VERSIONS_URL).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        let versions: Vec<String> = self.get_json(url).await?;
        versions
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::InvalidResponse("empty version list".to_string()))
    }

    /// Fetch and index the full champion catalog.
    pub async fn load_catalog(&self) -> Result<ChampionCatalog, SourceError> {
        let version = self.resolve_version().await?;
        let url = Url::parse(&format!("{}/{}/data/en_US/champion.json", DDRAGON_CDN, version))
            .map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        let payload: ChampionListDto = self.get_json(url).await?;

        let entries = build_entries(&version, payload.data);
        if entries.is_empty() {
            return Err(SourceError::InvalidResponse(
                "champion list is empty".to_string(),
            ));
        }

        info!(version = %version, champions = entries.len(), "loaded champion catalog");
        Ok(ChampionCatalog::new(version, entries))
    }
}

/// Convert Data Dragon champion entries into catalog entries, skipping
/// malformed ones. Output is sorted by id so catalog order is stable
/// across loads.
fn build_entries(version: &str, data: HashMap<String, ChampionDto>) -> Vec<ChampionInfo> {
    let mut entries: Vec<ChampionInfo> = data
        .into_iter()
        .filter_map(|(key, dto)| {
            let id = match dto.key.parse::<i64>() {
                Ok(id) => ChampionId::new(id),
                Err(_) => {
                    warn!(champion = %key, raw_key = %dto.key, "skipping champion with non-numeric key");
                    return None;
                }
            };
            let portrait_url = format!("{}/{}/img/champion/{}.png", DDRAGON_CDN, version, dto.id);
            Some(ChampionInfo {
                id,
                key_name: dto.id.to_lowercase(),
                name: dto.name,
                portrait_url,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.id);
    entries
}

#[derive(Debug, Deserialize)]
struct ChampionListDto {
    data: HashMap<String, ChampionDto>,
}

#[derive(Debug, Deserialize)]
struct ChampionDto {
    /// Display key, e.g. "MonkeyKing" for Wukong.
    id: String,

    /// Numeric champion id as a string.
    key: String,

    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(id: &str, key: &str, name: &str) -> ChampionDto {
        ChampionDto {
            id: id.to_string(),
            key: key.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_build_entries_maps_fields() {
        let mut data = HashMap::new();
        data.insert("Aatrox".to_string(), dto("Aatrox", "266", "Aatrox"));
        let entries = build_entries("6.9.1", data);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, ChampionId::new(266));
        assert_eq!(entries[0].key_name, "aatrox");
        assert_eq!(entries[0].name, "Aatrox");
        assert_eq!(
            entries[0].portrait_url,
            "https://ddragon.leagueoflegends.com/cdn/6.9.1/img/champion/Aatrox.png"
        );
    }

    #[test]
    fn test_build_entries_skips_bad_keys_and_sorts() {
        let mut data = HashMap::new();
        data.insert("MonkeyKing".to_string(), dto("MonkeyKing", "62", "Wukong"));
        data.insert("Broken".to_string(), dto("Broken", "not-a-number", "Broken"));
        data.insert("Ahri".to_string(), dto("Ahri", "103", "Ahri"));

        let entries = build_entries("6.9.1", data);
        let ids: Vec<i64> = entries.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![62, 103]);
    }

    #[test]
    fn test_champion_list_payload_parses() {
        let json = r#"{
            "type": "champion",
            "version": "6.9.1",
            "data": {
                "Aatrox": {"id": "Aatrox", "key": "266", "name": "Aatrox", "title": "the Darkin Blade"}
            }
        }"#;
        let payload: ChampionListDto = serde_json::from_str(json).unwrap();
        assert_eq!(payload.data["Aatrox"].key, "266");
    }
}
