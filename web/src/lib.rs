use domain::token_store::TokenStore;
use service::config::Config;
use std::sync::Arc;

pub(crate) mod controller;
pub mod error;
pub(crate) mod params;
pub mod router;

pub use error::{Error, Result};
pub use router::{define_routes, init_router};

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub token_store: Arc<TokenStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, token_store: &Arc<TokenStore>) -> Self {
        Self {
            token_store: Arc::clone(token_store),
            config: app_config,
        }
    }

    pub fn token_store_ref(&self) -> &TokenStore {
        self.token_store.as_ref()
    }
}
