use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ServerConfig;
use crate::store::TokenStore;

/// The application state
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    #[from_ref(skip)]
    started_at: Instant,
    config: Arc<ServerConfig>,
    store: TokenStore,
}

impl AppState {
    /// Create a state
    pub fn new(config: ServerConfig) -> Self {
        let store = TokenStore::new(config.environment.clone(), config.token_lifetime);
        Self {
            started_at: Instant::now(),
            config: Arc::new(config),
            store,
        }
    }

    pub(crate) fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
