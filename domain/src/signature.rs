//! Join signature generation for the Zoom meeting web SDK.
//!
//! The signature authorizes joining a specific meeting with a specific role
//! and is computed as layered base64 over an HMAC-SHA256 digest keyed with
//! the OAuth client secret.

use crate::error::{config_error, validation_error, Error, ValidationErrorKind};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use service::config::Config;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Backdate the signature timestamp so a client whose clock runs slightly
/// ahead of ours still presents a signature Zoom considers current.
const CLOCK_SKEW_MS: i64 = 30_000;

/// Generate a join signature for the given meeting number and role using the
/// configured Zoom client credentials.
///
/// A missing meeting number or missing role fails validation; role `0`
/// (participant) is valid.
pub fn generate_join_signature(
    config: &Config,
    meeting_number: Option<&str>,
    role: Option<&str>,
) -> Result<String, Error> {
    let client_id = config
        .zoom_client_id()
        .ok_or_else(|| config_error("Zoom client ID is not configured"))?;
    let client_secret = config
        .zoom_client_secret()
        .ok_or_else(|| config_error("Zoom client secret is not configured"))?;

    let timestamp = Utc::now().timestamp_millis() - CLOCK_SKEW_MS;
    signature_at(&client_id, &client_secret, meeting_number, role, timestamp)
}

/// Compute the signature for an explicit timestamp. Pure and deterministic
/// given its inputs.
fn signature_at(
    client_id: &str,
    client_secret: &str,
    meeting_number: Option<&str>,
    role: Option<&str>,
    timestamp: i64,
) -> Result<String, Error> {
    let meeting_number = match meeting_number {
        Some(number) if !number.is_empty() => number,
        _ => return Err(validation_error(ValidationErrorKind::MissingMeetingNumber)),
    };
    let role = role.ok_or_else(|| validation_error(ValidationErrorKind::MissingRole))?;

    let msg = BASE64.encode(format!("{client_id}{meeting_number}{timestamp}{role}"));

    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes()).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: crate::error::DomainErrorKind::Internal(
            crate::error::InternalErrorKind::Other("Invalid HMAC key".to_string()),
        ),
    })?;
    mac.update(msg.as_bytes());
    let hash = BASE64.encode(mac.finalize().into_bytes());

    Ok(BASE64.encode(format!(
        "{client_id}.{meeting_number}.{timestamp}.{role}.{hash}"
    )))
}
