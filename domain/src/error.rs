//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the domain layer are modeled as a tree structure with
/// `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer
/// or in calls to external services. The `source` field holds the original
/// error (or the provider's response body) that caused the domain error.
/// Ultimately the various `error_kind`s are used by `web` to return
/// appropriate HTTP status codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Auth(AuthErrorKind),
    Validation(ValidationErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur when
/// calling the Zoom API.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The network call itself failed.
    Network,
    /// Zoom rejected the access token (HTTP 401).
    Unauthorized,
    /// Zoom rejected the request for a reason other than an expired token.
    Provider,
}

/// Enum representing the various kinds of token lifecycle errors.
#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// No access token is available; no upstream call was attempted.
    NoToken,
    /// The OAuth authorization code exchange was rejected.
    ExchangeFailed,
    /// The refresh token exchange was rejected or failed on the network.
    RefreshFailed,
    /// The retried meeting call failed after a successful token refresh.
    RetryAfterRefreshFailed,
}

/// Enum representing the various kinds of request validation errors.
#[derive(Debug, PartialEq)]
pub enum ValidationErrorKind {
    MissingMeetingNumber,
    MissingRole,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

/// Helper function to create config errors for missing required settings.
pub fn config_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    }
}

/// Helper function to create token lifecycle errors.
pub fn auth_error(kind: AuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Auth(kind),
    }
}

/// Helper function to create validation errors.
pub fn validation_error(kind: ValidationErrorKind) -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Validation(kind),
    }
}

/// Helper function to create external provider errors carrying the provider's
/// response body.
pub fn external_error(kind: ExternalErrorKind, body: &str) -> Error {
    Error {
        source: Some(body.to_string().into()),
        error_kind: DomainErrorKind::External(kind),
    }
}
