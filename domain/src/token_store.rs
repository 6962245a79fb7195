//! In-memory store for the single active Zoom token pair.

use service::config::Config;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// The access/refresh token pair issued by Zoom.
///
/// No expiry timestamp is tracked; expiry is discovered reactively when Zoom
/// rejects a call with a 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Process-lifetime credential store shared by all requests.
///
/// Holds at most one active token pair, overwritten wholesale by every
/// successful exchange. The refresh lock serializes refreshes so that
/// concurrent requests hitting an expired token share one in-flight refresh
/// instead of issuing duplicate provider calls.
pub struct TokenStore {
    tokens: RwLock<Option<TokenPair>>,
    refresh_lock: Mutex<()>,
}

impl TokenStore {
    pub fn new(initial: Option<TokenPair>) -> Self {
        Self {
            tokens: RwLock::new(initial),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Seed the store from the `ACCESS_TOKEN` / `REFRESH_ACCESS_TOKEN`
    /// configuration values, when present.
    pub fn from_config(config: &Config) -> Self {
        let initial = config.initial_access_token().map(|access_token| TokenPair {
            access_token,
            refresh_token: config.initial_refresh_token().unwrap_or_default(),
        });
        Self::new(initial)
    }

    /// Returns a copy of the current token pair, if any.
    pub async fn get(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    /// Overwrites the stored token pair unconditionally.
    pub async fn replace(&self, tokens: TokenPair) {
        *self.tokens.write().await = Some(tokens);
    }

    /// Acquires the single-flight refresh guard. Held across the whole
    /// refresh exchange; callers must re-read the store after acquiring it,
    /// since another request may have completed a refresh in the meantime.
    pub async fn refresh_guard(&self) -> MutexGuard<'_, ()> {
        self.refresh_lock.lock().await
    }
}
