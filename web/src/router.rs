use crate::{controller::health_check_controller, AppState};
use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::controller::{meeting_controller, oauth_controller, signature_controller};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Zoom Meeting Relay API"
        ),
        paths(
            health_check_controller::health_check,
            meeting_controller::create,
            oauth_controller::authorize,
            oauth_controller::callback,
            signature_controller::generate,
        ),
        components(
            schemas(
                crate::params::signature::GenerateParams,
                crate::controller::oauth_controller::TokenPairResponse,
                crate::controller::signature_controller::SignatureResponse,
                domain::meeting::MeetingResult,
            )
        ),
        tags(
            (name = "zoom_meeting_relay", description = "Zoom meeting creation relay API")
        )
    )]
struct ApiDoc;

/// Assemble the application router with CORS applied from the configured
/// allowed origins.
pub fn init_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.allowed_origins);
    define_routes(app_state).layer(cors)
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(oauth_routes(app_state.clone()))
        .merge(meeting_routes(app_state.clone()))
        .merge(signature_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/zoom-auth", get(oauth_controller::authorize))
        .route("/api/callback", get(oauth_controller::callback))
        .with_state(app_state)
}

fn meeting_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/create-meeting", post(meeting_controller::create))
        .with_state(app_state)
}

fn signature_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/generate-signature",
            post(signature_controller::generate),
        )
        .with_state(app_state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use domain::token_store::TokenStore;
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let config = Config::try_parse_from(["zoom_meeting_relay"])
            .unwrap()
            .set_zoom_client_id("test_client_id".to_string())
            .set_zoom_client_secret("test_client_secret".to_string());
        AppState::new(config, &Arc::new(TokenStore::new(None)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check_responds_ok() {
        let router = init_router(test_state());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_zoom_auth_redirects_to_consent_page() {
        let router = init_router(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/zoom-auth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers().get(header::LOCATION).unwrap();
        let location = location.to_str().unwrap();
        assert!(location.starts_with("https://zoom.us/oauth/authorize?"));
        assert_eq!(location.matches("client_id=").count(), 1);
        assert_eq!(location.matches("redirect_uri=").count(), 1);
    }

    #[tokio::test]
    async fn test_generate_signature_returns_signature() {
        let router = init_router(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/generate-signature")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"meetingNumber": "123456789", "role": 0}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["signature"].is_string());
        assert!(!body["signature"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_signature_without_role_is_bad_request() {
        let router = init_router(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/generate-signature")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"meetingNumber": "123456789"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_meeting_without_token_is_unauthorized() {
        let router = init_router(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/create-meeting")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"topic": "Standup"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
