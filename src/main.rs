//! Edge Relay
//!
//! Main entry point for the relay service.

use edge_relay::{
    delivery::DeliveryLoop,
    demand_state::DemandState,
    event_log::EventLog,
    image_slot::ImageSlot,
    peer_client::PeerClient,
    state::{AppConfig, AppState},
    web_api,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Edge Relay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        log_file = %config.log_file.display(),
        peer_upload_url = %config.peer_upload_url,
        delivery_interval_secs = config.delivery_interval_secs,
        "Configuration loaded"
    );

    // Initialize components
    let event_log = Arc::new(EventLog::new(config.log_file.clone()));
    let slot = Arc::new(ImageSlot::new(config.upload_dir.clone()).await?);
    let demand = Arc::new(DemandState::new());
    let peer = Arc::new(PeerClient::new(
        config.peer_upload_url.clone(),
        config.request_timeout_secs,
    )?);

    let state = AppState {
        config: config.clone(),
        slot: slot.clone(),
        event_log: event_log.clone(),
        demand: demand.clone(),
        peer: peer.clone(),
    };

    // Start delivery loop
    let delivery = DeliveryLoop::new(
        slot,
        demand,
        peer,
        event_log.clone(),
        Duration::from_secs(config.delivery_interval_secs),
    );
    delivery.start().await;

    // Build router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = web_api::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    event_log.record("Relay service started.").await;

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    delivery.stop().await;
    event_log.record("Relay service stopped.").await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
