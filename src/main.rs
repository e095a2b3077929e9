//! Project Time - per-project active time tracker
//!
//! This is the main entry point for the project-time daemon.

use std::{path::Path, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use project_time::{
    api::create_router,
    config::Config,
    services::PersistentStore,
    state::{format_time_spent, AppState, CoderType},
    tasks::checkpoint_timer_task,
    utils::{shutdown_signal, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("project_time={},tower_http=info", config.log_level()))
        .init();

    let project_root = config.project_root()?;

    if config.show {
        return show_time_spent(project_root.as_deref());
    }

    info!("Starting project-time tracker v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, checkpoint={}min, project={}",
        config.host,
        config.port,
        config.checkpoint_interval,
        project_root
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );

    // The first-run prompt may block on stdin
    let prompt = config.prompt();
    let (port, host, checkpoint) = (config.port, config.host.clone(), config.checkpoint_interval);
    let state = Arc::new(
        tokio::task::spawn_blocking(move || {
            AppState::new(
                project_root.as_deref(),
                prompt.as_ref(),
                Arc::new(SystemClock),
                port,
                host,
                checkpoint,
            )
        })
        .await?,
    );

    // Start the periodic checkpoint background task
    let checkpoint_state = Arc::clone(&state);
    tokio::spawn(async move {
        checkpoint_timer_task(checkpoint_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /focus             - Window focus changed {{\"focused\": bool}}");
    info!("  POST /save              - Document saved (checkpoint)");
    info!("  POST /close             - Document closed (checkpoint)");
    info!("  POST /workspace-changed - Workspace folders changed (checkpoint)");
    info!("  POST /shutdown          - Flush totals and stop");
    info!("  GET  /status            - Totals, status label and notices");
    info!("  GET  /time-spent        - Total time spent summary");
    info!("  GET  /health            - Health check");

    // Setup graceful shutdown: stop accepting, let in-flight requests finish
    let shutdown_state = Arc::clone(&state);
    let stop = async move {
        tokio::select! {
            _ = shutdown_signal() => {
                info!("Shutdown signal received");
            }
            _ = shutdown_state.shutdown_requested.notified() => {
                info!("Shutdown requested by client");
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(stop).await {
        tracing::error!("Server error: {}", e);
    }

    match state.shutdown() {
        Ok(snapshot) => info!(
            "Final totals: {:.0}s active, {:.0}s other ({})",
            snapshot.totals.active_seconds, snapshot.totals.other_seconds, snapshot.label
        ),
        Err(e) => tracing::error!("Failed to flush tracker: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Print the stored summary for a project without starting the tracker
fn show_time_spent(project_root: Option<&Path>) -> anyhow::Result<()> {
    let Some(root) = project_root else {
        anyhow::bail!("No project folder found");
    };

    let store = PersistentStore::for_project(Some(root));
    if !store.exists() {
        println!("No timer data found for {}", root.display());
        return Ok(());
    }

    let state = store.load()?;
    println!("Total time spent: {}", format_time_spent(state.active_seconds));
    println!("Other time:       {}", format_time_spent(state.other_seconds));
    println!("Status:           {}", CoderType::from_active_seconds(state.active_seconds));
    Ok(())
}
