//! Controller for the Zoom OAuth authorization-code flow.
//!
//! Note: both endpoints work via browser redirects. The authorize endpoint
//! sends the user to Zoom's consent page, and Zoom redirects back to the
//! callback with a one-time authorization code.

use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::zoom_connection;
use log::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query parameters for the OAuth callback
#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: String,
}

/// Token pair returned to the caller after a successful code exchange
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// GET /api/zoom-auth
///
/// Initiates the OAuth flow by redirecting to Zoom's authorization endpoint.
#[utoipa::path(
    get,
    path = "/api/zoom-auth",
    responses(
        (status = 302, description = "Redirect to Zoom's OAuth consent page"),
        (status = 500, description = "Zoom OAuth is not configured"),
    )
)]
pub async fn authorize(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let url = zoom_connection::zoom_authorize_url(&app_state.config)?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]))
}

/// GET /api/callback
///
/// Handles the OAuth callback from Zoom after user consent, exchanging the
/// authorization code for a token pair.
#[utoipa::path(
    get,
    path = "/api/callback",
    params(
        ("code" = String, Query, description = "Authorization code from Zoom"),
    ),
    responses(
        (status = 200, description = "Tokens obtained and stored", body = TokenPairResponse),
        (status = 500, description = "Token exchange failed"),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET OAuth callback from Zoom");

    let pair = zoom_connection::exchange_and_store_tokens(
        &app_state.config,
        app_state.token_store_ref(),
        &params.code,
    )
    .await?;

    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}
