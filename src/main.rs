use domain::token_store::TokenStore;
use log::info;
use service::{config::Config, logging::Logger};
use std::sync::Arc;
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();

    Logger::init_logger(&config);

    if config.zoom_client_id().is_none() || config.zoom_client_secret().is_none() {
        info!("Zoom client credentials are not configured; OAuth endpoints will return errors");
    }

    let token_store = Arc::new(TokenStore::from_config(&config));
    let listen_address = format!(
        "{}:{}",
        config.interface.as_deref().unwrap_or("127.0.0.1"),
        config.port
    );

    let app_state = AppState::new(config, &token_store);
    let router = web::init_router(app_state);

    info!("Server starting... listening for connections on http://{listen_address}");

    let listener = tokio::net::TcpListener::bind(&listen_address)
        .await
        .expect("Failed to bind to listen address");

    axum::serve(listener, router)
        .await
        .expect("Failed to start axum server");
}
