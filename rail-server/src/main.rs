use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rail_server::booking::{NotificationChannel, WebhookNotifier};
use rail_server::config::AppConfig;
use rail_server::network::load_network;
use rail_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rail_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();

    let network = load_network(&config.network_file)?;

    let notifier = match config.webhook.clone() {
        Some(webhook) => match WebhookNotifier::new(webhook) {
            Ok(notifier) => {
                info!(url = notifier.url(), "sending confirmations to webhook");
                NotificationChannel::Webhook(notifier)
            }
            Err(e) => {
                warn!(error = %e, "webhook notifier unavailable, logging confirmations instead");
                NotificationChannel::default()
            }
        },
        None => NotificationChannel::default(),
    };

    let state = AppState::new(network, notifier, config.search.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "rail booking server listening");
    info!("API endpoints:");
    info!("  GET  /health");
    info!("  GET  /api/stations/search?q=");
    info!("  POST /api/search");
    info!("  POST /api/bookings");
    info!("  GET  /api/bookings/:pnr");
    info!("  GET  /api/bookings/:pnr/ticket");
    info!("  POST /api/bookings/:pnr/cancel");
    info!("  GET  /api/me/bookings");
    info!("  GET  /api/admin/summary");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
