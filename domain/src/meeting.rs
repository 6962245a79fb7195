//! Meeting creation proxy.
//!
//! Relays a create-meeting request to Zoom with the stored access token. When
//! Zoom rejects the token (401), the token is refreshed once and the call is
//! retried once with the new token. Any failure after that is terminal, which
//! bounds every request to at most two upstream meeting calls and one refresh.

use crate::error::{auth_error, AuthErrorKind, DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::zoom::{MeetingResponse, ZoomMeetingClient};
use crate::token_store::TokenStore;
use crate::zoom_connection;
use chrono::{SecondsFormat, Utc};
use log::*;
use serde::Serialize;
use serde_json::{json, Value};
use service::config::Config;
use utoipa::ToSchema;

/// Zoom meeting type for a scheduled meeting.
const MEETING_TYPE_SCHEDULED: i64 = 2;

/// Subset of Zoom's meeting payload surfaced to the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeetingResult {
    pub meeting_id: u64,
    pub join_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<MeetingResponse> for MeetingResult {
    fn from(response: MeetingResponse) -> Self {
        Self {
            meeting_id: response.id,
            join_url: response.join_url,
            password: response.password,
        }
    }
}

/// Create a Zoom meeting on behalf of the caller.
///
/// Fails with `NoToken` before any upstream call when no access token is
/// stored. The first attempt sends the normalized payload; on a 401 the token
/// is refreshed (single-flight) and the caller's original payload is retried
/// exactly once with the new token.
pub async fn create_meeting(
    config: &Config,
    store: &TokenStore,
    payload: Value,
) -> Result<MeetingResult, Error> {
    let tokens = store
        .get()
        .await
        .filter(|pair| !pair.access_token.is_empty())
        .ok_or_else(|| auth_error(AuthErrorKind::NoToken, "No access token available"))?;

    let normalized = normalize_payload(&payload);

    let client = ZoomMeetingClient::new(&tokens.access_token, config.zoom_api_base_url())?;
    match client.create_meeting(&normalized).await {
        Ok(meeting) => Ok(meeting.into()),
        Err(e) if is_unauthorized(&e) => {
            info!("Access token rejected by Zoom, refreshing and retrying once");

            let access_token =
                zoom_connection::refresh_access_token(config, store, &tokens.access_token).await?;

            let retry_client = ZoomMeetingClient::new(&access_token, config.zoom_api_base_url())?;
            retry_client
                .create_meeting(&payload)
                .await
                .map(MeetingResult::from)
                .map_err(|e| {
                    warn!("Zoom meeting creation failed after token refresh: {:?}", e);
                    Error {
                        source: Some(Box::new(e)),
                        error_kind: DomainErrorKind::Auth(AuthErrorKind::RetryAfterRefreshFailed),
                    }
                })
        }
        Err(e) => Err(e),
    }
}

fn is_unauthorized(err: &Error) -> bool {
    err.error_kind == DomainErrorKind::External(ExternalErrorKind::Unauthorized)
}

/// Merge defaults into the caller-supplied meeting fields: the meeting type is
/// forced to "scheduled", and a start time and timezone are filled in when the
/// caller omits them.
fn normalize_payload(payload: &Value) -> Value {
    let mut meeting = payload.as_object().cloned().unwrap_or_default();

    meeting.insert("type".to_string(), json!(MEETING_TYPE_SCHEDULED));
    meeting
        .entry("timezone".to_string())
        .or_insert_with(|| json!("UTC"));
    meeting.entry("start_time".to_string()).or_insert_with(|| {
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    });

    Value::Object(meeting)
}
