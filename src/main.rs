//! Cooking Timer - a start/pause/reset stopwatch widget served over HTTP
//!
//! This is the main entry point for the cooking-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use cooking_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("cooking_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting cooking-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, autostart={}",
          config.host, config.port, config.tick_ms, config.autostart);

    // Create application state, which mounts the widget
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.tick_period()));

    if config.autostart {
        if let Err(e) = state.with_widget("start", |widget| widget.engine_mut().start()) {
            tracing::error!("Failed to autostart timer: {}", e);
        }
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer           - Render the timer");
    info!("  POST /timer/start     - Start the timer");
    info!("  POST /timer/pause     - Pause the timer");
    info!("  POST /timer/toggle    - Start or pause");
    info!("  POST /timer/reset     - Reset to 00:00");
    info!("  GET  /timer/events    - Stream timer updates (SSE)");
    info!("  POST /widget/mount    - Mount a fresh widget");
    info!("  POST /widget/unmount  - Tear the widget down");
    info!("  GET  /status          - Widget and server status");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Unmount so no tick producer outlives the server
    match state.unmount_widget() {
        Ok(Some(last)) => info!("Final time: {}", last.formatted()),
        Ok(None) => {}
        Err(e) => tracing::error!("Failed to unmount widget: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
