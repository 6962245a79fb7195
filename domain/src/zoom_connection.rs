//! Orchestration of the Zoom OAuth connection: authorization URL building,
//! code exchange, and single-flight token refresh against the in-memory
//! token store.

use crate::error::{auth_error, config_error, AuthErrorKind, Error};
use crate::gateway::zoom::ZoomOAuthClient;
use crate::token_store::{TokenPair, TokenStore};
use log::*;
use service::config::Config;

/// Build the Zoom OAuth authorization URL for user consent.
pub fn zoom_authorize_url(config: &Config) -> Result<String, Error> {
    let client = create_oauth_client(config)?;
    Ok(client.get_authorization_url())
}

/// Exchange an authorization code for tokens and store them.
///
/// Returns the new token pair so the callback endpoint can surface it.
pub async fn exchange_and_store_tokens(
    config: &Config,
    store: &TokenStore,
    authorization_code: &str,
) -> Result<TokenPair, Error> {
    let client = create_oauth_client(config)?;

    let response = client
        .exchange_code(authorization_code)
        .await
        .inspect_err(|e| warn!("Failed to exchange Zoom OAuth code: {:?}", e))?;

    let pair = TokenPair {
        access_token: response.access_token,
        refresh_token: response.refresh_token.unwrap_or_default(),
    };
    store.replace(pair.clone()).await;

    info!("Stored new Zoom token pair from authorization code exchange");
    Ok(pair)
}

/// Refresh the stored access token and return the new one.
///
/// Refreshes are single-flight: the store's refresh guard is held across the
/// provider call, and after acquiring it the store is re-read. If another
/// request already rotated the pair while this one was waiting, its fresh
/// access token is reused and no duplicate provider call is made.
/// `stale_access_token` is the token the caller just saw rejected.
pub async fn refresh_access_token(
    config: &Config,
    store: &TokenStore,
    stale_access_token: &str,
) -> Result<String, Error> {
    let _guard = store.refresh_guard().await;

    let current = store
        .get()
        .await
        .ok_or_else(|| auth_error(AuthErrorKind::RefreshFailed, "No refresh token available"))?;

    if current.access_token != stale_access_token && !current.access_token.is_empty() {
        debug!("Token was already refreshed by another request");
        return Ok(current.access_token);
    }

    if current.refresh_token.is_empty() {
        return Err(auth_error(
            AuthErrorKind::RefreshFailed,
            "No refresh token available",
        ));
    }

    let client = create_oauth_client(config)?;
    let response = client
        .refresh_token(&current.refresh_token)
        .await
        .inspect_err(|e| warn!("Zoom token refresh failed: {:?}", e))?;

    let pair = TokenPair {
        access_token: response.access_token.clone(),
        // Zoom rotates refresh tokens on every exchange
        refresh_token: response.refresh_token.unwrap_or(current.refresh_token),
    };
    store.replace(pair).await;

    info!("Successfully refreshed Zoom access token");
    Ok(response.access_token)
}

/// Create a Zoom OAuth client from config.
fn create_oauth_client(config: &Config) -> Result<ZoomOAuthClient, Error> {
    let client_id = config
        .zoom_client_id()
        .ok_or_else(|| config_error("Zoom client ID is not configured"))?;

    let client_secret = config
        .zoom_client_secret()
        .ok_or_else(|| config_error("Zoom client secret is not configured"))?;

    ZoomOAuthClient::new(
        &client_id,
        &client_secret,
        &config.redirect_uri(),
        config.zoom_oauth_base_url(),
    )
}
