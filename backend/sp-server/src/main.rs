use sp_server::{Result as ServerErrorResult, ServerState, build_router, logger};

use sp_config::Config;
use sp_ws::ShutdownCoordinator;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ServerErrorResult<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();

    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting sp-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool (runs migrations)
    let pool = sp_db::connect(&config.database_path()?).await?;
    info!("Database connection established");

    // Global metrics recorder, rendered at /metrics
    let prometheus = PrometheusBuilder::new().install_recorder()?;

    // Create shutdown coordinator
    let shutdown = ShutdownCoordinator::new();

    // Build application state and start the per-role broadcasters
    let state = ServerState::new(&config, pool, prometheus, shutdown.clone());
    let broadcasters = state.spawn_broadcasters();
    info!("Started {} presence broadcasters", broadcasters.len());

    // Build router
    let app = build_router(state);

    // Create TCP listener
    let listener = TcpListener::bind(config.bind_addr()).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    let mut server_guard = shutdown.subscribe_guard();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            server_guard.wait().await;
        })
        .await?;

    for broadcaster in broadcasters {
        if let Err(e) = broadcaster.await {
            warn!("Presence broadcaster ended abnormally: {e}");
        }
    }

    info!("Graceful shutdown complete");
    Ok(())
}
