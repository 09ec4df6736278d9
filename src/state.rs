use std::sync::Arc;

use axum::extract::FromRef;

use crate::{cache::ListCache, config::Config, store::Store};

/// Shared handle to whichever store backs the app.
pub type Db = Arc<dyn Store>;

#[derive(Clone)]
pub struct AppState {
    pub store: Db,
    pub cache: Arc<ListCache>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Db, config: Config) -> Self {
        Self {
            store,
            cache: Arc::new(ListCache::new()),
            config,
        }
    }
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<ListCache> {
    fn from_ref(state: &AppState) -> Self {
        state.cache.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
