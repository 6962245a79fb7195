//! Controller for meeting join signature generation.

use crate::params::signature::{text_value, GenerateParams};
use crate::{AppState, Error};

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::signature;
use log::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SignatureResponse {
    pub signature: String,
}

/// POST generate a meeting join signature
#[utoipa::path(
    post,
    path = "/api/generate-signature",
    request_body = GenerateParams,
    responses(
        (status = 200, description = "Join signature generated", body = SignatureResponse),
        (status = 400, description = "Missing meeting number or role"),
        (status = 500, description = "Zoom OAuth is not configured"),
    )
)]
pub async fn generate(
    State(app_state): State<AppState>,
    Json(params): Json<GenerateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Generate meeting join signature");

    let meeting_number = text_value(&params.meeting_number);
    let role = text_value(&params.role);

    let signature = signature::generate_join_signature(
        &app_state.config,
        meeting_number.as_deref(),
        role.as_deref(),
    )?;

    Ok(Json(SignatureResponse { signature }))
}
