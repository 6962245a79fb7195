//! Controller for proxied Zoom meeting creation.

use crate::{AppState, Error};

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::meeting;
use log::*;
use serde_json::Value;

/// POST create a Zoom meeting
///
/// The request body is forwarded to Zoom largely as-is; the meeting type is
/// forced to "scheduled" and a start time and timezone are defaulted.
#[utoipa::path(
    post,
    path = "/api/create-meeting",
    request_body = Value,
    responses(
        (status = 200, description = "Meeting created successfully", body = meeting::MeetingResult),
        (status = 401, description = "No access token available"),
        (status = 500, description = "Zoom rejected the request"),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create Zoom meeting");

    let result =
        meeting::create_meeting(&app_state.config, app_state.token_store_ref(), payload).await?;

    debug!("Created Zoom meeting: {}", result.meeting_id);

    Ok(Json(result))
}
