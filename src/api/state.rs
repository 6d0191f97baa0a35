use std::sync::Arc;

use crate::cache::SummonerCache;
use crate::catalog::ChampionCatalog;

#[derive(Clone)]
pub struct AppState {
    pub cache: SummonerCache,
    pub catalog: Arc<ChampionCatalog>,
}
