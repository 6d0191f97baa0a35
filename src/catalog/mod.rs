//! Champion catalog: static reference data, loaded once at startup.
//!
//! The catalog is immutable after construction and shared as
//! `Arc<ChampionCatalog>`, so concurrent readers need no
//! synchronization. Its size is the denominator for every
//! "champions not played" figure.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::ChampionId;

/// Static-data CDN all image URLs derive from.
pub const DDRAGON_CDN: &str = "https://ddragon.leagueoflegends.com/cdn";

/// Catalog metadata for one champion.
#[derive(Debug, Clone, Serialize)]
pub struct ChampionInfo {
    pub id: ChampionId,

    /// URL-safe lowercase key, unique per champion.
    pub key_name: String,

    /// Display name.
    pub name: String,

    pub portrait_url: String,
}

/// Lookup table over all champions in the game, keyed by id and by
/// key name.
#[derive(Debug, Clone)]
pub struct ChampionCatalog {
    version: String,
    entries: Vec<ChampionInfo>,
    by_id: HashMap<ChampionId, usize>,
    by_key_name: HashMap<String, usize>,
}

impl ChampionCatalog {
    /// Build the indexes from loaded entries.
    ///
    /// Duplicate ids or key names keep the first occurrence; upstream
    /// data should never contain them, so each one is logged.
    pub fn new(version: impl Into<String>, entries: Vec<ChampionInfo>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_key_name = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if by_id.contains_key(&entry.id) {
                tracing::warn!(champion_id = %entry.id, "duplicate champion id in catalog");
            } else {
                by_id.insert(entry.id, idx);
            }
            if by_key_name.contains_key(&entry.key_name) {
                tracing::warn!(key_name = %entry.key_name, "duplicate champion key in catalog");
            } else {
                by_key_name.insert(entry.key_name.clone(), idx);
            }
        }
        Self {
            version: version.into(),
            entries,
            by_id,
            by_key_name,
        }
    }

    /// Static-data version the catalog was built from.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn by_id(&self, id: ChampionId) -> Option<&ChampionInfo> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx])
    }

    /// Lookup by key name, case-insensitive.
    pub fn by_key_name(&self, key: &str) -> Option<&ChampionInfo> {
        self.by_key_name
            .get(&key.to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// Total champions in the game.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChampionInfo> {
        self.entries.iter()
    }

    /// Profile icon image URL for this catalog's static-data version.
    pub fn profile_icon_url(&self, icon_id: i32) -> String {
        format!("{}/{}/img/profileicon/{}.png", DDRAGON_CDN, self.version, icon_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, key: &str, name: &str) -> ChampionInfo {
        ChampionInfo {
            id: ChampionId::new(id),
            key_name: key.to_string(),
            name: name.to_string(),
            portrait_url: format!("{}/6.9.1/img/champion/{}.png", DDRAGON_CDN, name),
        }
    }

    fn catalog() -> ChampionCatalog {
        ChampionCatalog::new(
            "6.9.1",
            vec![
                entry(266, "aatrox", "Aatrox"),
                entry(64, "leesin", "Lee Sin"),
                entry(432, "bard", "Bard"),
            ],
        )
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.by_id(ChampionId::new(64)).unwrap().name, "Lee Sin");
        assert!(catalog.by_id(ChampionId::new(9999)).is_none());
    }

    #[test]
    fn test_lookup_by_key_name_case_insensitive() {
        let catalog = catalog();
        assert_eq!(catalog.by_key_name("bard").unwrap().name, "Bard");
        assert_eq!(catalog.by_key_name("LeeSin").unwrap().name, "Lee Sin");
        assert!(catalog.by_key_name("teemo").is_none());
    }

    #[test]
    fn test_len_counts_all_champions() {
        assert_eq!(catalog().len(), 3);
        assert!(!catalog().is_empty());
        assert!(ChampionCatalog::new("6.9.1", Vec::new()).is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = ChampionCatalog::new(
            "6.9.1",
            vec![entry(1, "first", "First"), entry(1, "second", "Second")],
        );
        assert_eq!(catalog.by_id(ChampionId::new(1)).unwrap().name, "First");
        // Both entries still count toward the catalog size.
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_profile_icon_url() {
        assert_eq!(
            catalog().profile_icon_url(588),
            "https://ddragon.leagueoflegends.com/cdn/6.9.1/img/profileicon/588.png"
        );
    }
}
