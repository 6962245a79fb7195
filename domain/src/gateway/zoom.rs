//! Zoom OAuth and Meeting API client.
//!
//! This module provides HTTP clients for interacting with Zoom's OAuth token
//! endpoint and the Zoom REST API to create meetings.

use crate::error::{auth_error, external_error, AuthErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Timeout applied to every outbound call so a slow upstream cannot stall a
/// request indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OAuth token response from Zoom
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

/// Subset of Zoom's create-meeting response surfaced to callers
#[derive(Debug, Deserialize)]
pub struct MeetingResponse {
    pub id: u64,
    pub join_url: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Zoom OAuth client for the authorization-code and refresh-token grants
pub struct ZoomOAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    base_url: String,
}

impl ZoomOAuthClient {
    /// Create a new Zoom OAuth client with a configurable base URL
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        base_url: &str,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            base_url: base_url.to_string(),
        })
    }

    /// Generate the OAuth authorization URL for user consent
    pub fn get_authorization_url(&self) -> String {
        format!(
            "{}/oauth/authorize?\
            response_type=code&\
            client_id={}&\
            redirect_uri={}",
            self.base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri)
        )
    }

    /// Exchange an authorization code for access and refresh tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        debug!("Exchanging Zoom OAuth code for tokens");

        let response = self
            .client
            .post(format!("{}/oauth/token", self.base_url))
            .query(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
            ])
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Zoom OAuth code: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: crate::error::DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Zoom token response: {:?}", e);
                auth_error(
                    AuthErrorKind::ExchangeFailed,
                    "Invalid response from Zoom OAuth",
                )
            })?;
            info!("Successfully exchanged Zoom OAuth code for tokens");
            Ok(tokens)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Zoom OAuth error: {}", error_text);
            Err(auth_error(AuthErrorKind::ExchangeFailed, &error_text))
        }
    }

    /// Refresh an expired access token using the refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, Error> {
        debug!("Refreshing Zoom access token");

        let response = self
            .client
            .post(format!("{}/oauth/token", self.base_url))
            .query(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to refresh Zoom token: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: crate::error::DomainErrorKind::Auth(AuthErrorKind::RefreshFailed),
                }
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Zoom token refresh response: {:?}", e);
                auth_error(
                    AuthErrorKind::RefreshFailed,
                    "Invalid response from Zoom OAuth",
                )
            })?;
            info!("Successfully refreshed Zoom access token");
            Ok(tokens)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Zoom token refresh error: {}", error_text);
            Err(auth_error(AuthErrorKind::RefreshFailed, &error_text))
        }
    }
}

/// Zoom REST API client for creating meetings
pub struct ZoomMeetingClient {
    client: reqwest::Client,
    base_url: String,
}

impl ZoomMeetingClient {
    /// Create a new Zoom meeting client with the given access token and base URL
    pub fn new(access_token: &str, base_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Bearer {}", access_token);
        let mut header_value =
            reqwest::header::HeaderValue::from_str(&auth_value).map_err(|e| {
                warn!("Failed to create auth header: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: crate::error::DomainErrorKind::Internal(
                        crate::error::InternalErrorKind::Other(
                            "Invalid access token format".to_string(),
                        ),
                    ),
                }
            })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Create a meeting for the authorized user
    pub async fn create_meeting(&self, payload: &Value) -> Result<MeetingResponse, Error> {
        let url = format!("{}/users/me/meetings", self.base_url);

        debug!("Creating Zoom meeting");

        let response = self.client.post(&url).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            let meeting: MeetingResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Zoom meeting response: {:?}", e);
                external_error(
                    ExternalErrorKind::Provider,
                    "Invalid response from Zoom Meeting API",
                )
            })?;
            info!("Created Zoom meeting: {}", meeting.id);
            Ok(meeting)
        } else if status == reqwest::StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            debug!("Zoom rejected the access token: {}", error_text);
            Err(external_error(ExternalErrorKind::Unauthorized, &error_text))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Zoom Meeting API error: {}", error_text);
            Err(external_error(ExternalErrorKind::Provider, &error_text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use serde_json::json;

    #[test]
    fn test_authorization_url_parameters_encoded_once() {
        let client = ZoomOAuthClient::new(
            "client id",
            "secret",
            "http://localhost:3000/api/callback",
            "https://zoom.us",
        )
        .unwrap();

        let url = client.get_authorization_url();

        assert_eq!(url.matches("client_id=").count(), 1);
        assert_eq!(url.matches("redirect_uri=").count(), 1);
        assert_eq!(url.matches("response_type=code").count(), 1);
        // Reserved characters in the redirect URI are encoded exactly once
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fapi%2Fcallback"));
        assert!(!url.contains("%253A"));
        // Space in the client id is percent-encoded
        assert!(url.contains("client_id=client%20id"));
    }

    #[tokio::test]
    async fn test_exchange_code_sends_basic_auth_and_grant() {
        let mut server = mockito::Server::new_async().await;

        // Basic base64("client_id:client_secret")
        let mock = server
            .mock("POST", "/oauth/token")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                mockito::Matcher::UrlEncoded("code".into(), "auth_code_123".into()),
            ]))
            .match_header(
                "authorization",
                "Basic Y2xpZW50X2lkOmNsaWVudF9zZWNyZXQ=",
            )
            .with_status(200)
            .with_body(
                json!({
                    "access_token": "at_1",
                    "refresh_token": "rt_1",
                    "expires_in": 3599,
                    "token_type": "bearer",
                    "scope": "meeting:write"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ZoomOAuthClient::new(
            "client_id",
            "client_secret",
            "http://localhost:3000/api/callback",
            &server.url(),
        )
        .unwrap();

        let tokens = client.exchange_code("auth_code_123").await.unwrap();
        assert_eq!(tokens.access_token, "at_1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt_1"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_exchange_code_rejection_carries_provider_body() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/oauth/token")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"reason":"Invalid authorization code"}"#)
            .create_async()
            .await;

        let client = ZoomOAuthClient::new(
            "client_id",
            "client_secret",
            "http://localhost:3000/api/callback",
            &server.url(),
        )
        .unwrap();

        let err = client.exchange_code("bad_code").await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Auth(AuthErrorKind::ExchangeFailed)
        );
        let body = err.source.unwrap().to_string();
        assert!(body.contains("Invalid authorization code"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_meeting_distinguishes_unauthorized_from_provider_error() {
        let mut server = mockito::Server::new_async().await;

        let unauthorized = server
            .mock("POST", "/users/me/meetings")
            .match_header("authorization", "Bearer expired")
            .with_status(401)
            .with_body(r#"{"code":124,"message":"Invalid access token."}"#)
            .create_async()
            .await;
        let rejected = server
            .mock("POST", "/users/me/meetings")
            .match_header("authorization", "Bearer valid")
            .with_status(400)
            .with_body(r#"{"code":300,"message":"Invalid topic."}"#)
            .create_async()
            .await;

        let payload = json!({"topic": "Standup"});

        let expired_client = ZoomMeetingClient::new("expired", &server.url()).unwrap();
        let err = expired_client.create_meeting(&payload).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Unauthorized)
        );

        let valid_client = ZoomMeetingClient::new("valid", &server.url()).unwrap();
        let err = valid_client.create_meeting(&payload).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Provider)
        );

        unauthorized.assert_async().await;
        rejected.assert_async().await;
    }
}
