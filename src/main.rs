//! Segura Alert - A state-managed HTTP server for emergency alerts
//!
//! This is the main entry point for the segura-alert application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use segura_alert::{
    api::create_router,
    config::Config,
    services::{AlertNotifier, LogNotifier},
    state::AppState,
    tasks::{alert_dispatch_task, countdown_timer_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("segura_alert={},tower_http=info", config.log_level()))
        .init();

    info!("Starting segura-alert server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, countdown={}s, tick={}ms, contacts={}",
        config.host,
        config.port,
        config.countdown,
        config.tick_millis,
        config.app_config().contacts.len()
    );

    // Create application state
    let state = Arc::new(AppState::new(config.app_config()));
    let notifier: Arc<dyn AlertNotifier> = Arc::new(LogNotifier::new(config.location));

    // Start the background tasks
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_timer_task(timer_state).await;
    });

    let dispatch_state = Arc::clone(&state);
    tokio::spawn(async move {
        alert_dispatch_task(dispatch_state, notifier).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /alert/trigger  - Start the SOS countdown");
    info!("  POST /alert/send-now - Send the alert immediately");
    info!("  POST /alert/cancel   - Cancel the countdown");
    info!("  POST /alert/resolve  - Record feedback for a sent alert");
    info!("  POST /alert/dismiss  - Close a finished alert");
    info!("  GET  /alert          - Current alert and countdown");
    info!("  GET  /history        - Finished alerts");
    info!("  GET  /contacts       - Emergency contacts");
    info!("  GET  /status         - Server status");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
