use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{AuthErrorKind, DomainErrorKind, Error as DomainError, ExternalErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Validation errors map to 400, a missing or rejected token maps to 401,
// everything else is a 500.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Validation(_) => {
                (StatusCode::BAD_REQUEST, "BAD REQUEST").into_response()
            }
            DomainErrorKind::Auth(auth_error_kind) => match auth_error_kind {
                AuthErrorKind::NoToken => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
                }
                AuthErrorKind::ExchangeFailed
                | AuthErrorKind::RefreshFailed
                | AuthErrorKind::RetryAfterRefreshFailed => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
                }
                ExternalErrorKind::Network | ExternalErrorKind::Provider => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::{auth_error, validation_error, ValidationErrorKind};

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let err: Error = validation_error(ValidationErrorKind::MissingRole).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_token_maps_to_unauthorized() {
        let err: Error = auth_error(AuthErrorKind::NoToken, "no token").into();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_refresh_failures_map_to_internal_server_error() {
        let err: Error = auth_error(AuthErrorKind::RefreshFailed, "rejected").into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let err: Error = auth_error(AuthErrorKind::RetryAfterRefreshFailed, "rejected").into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
