//! Shelter Service
//!
//! Serves adoption-likelihood predictions over HTTP.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use shelter_service::{create_router, AppState, ServiceConfig};
use shelter_store::StoreConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "shelter-service")]
#[command(about = "Adoption-likelihood prediction service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "service.yaml")]
    config: PathBuf,

    /// Trained artifact path
    #[arg(short, long, env = "ADOPTION_MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Enable the dashboard endpoints over the JSON-lines store in this directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    listen: String,

    /// Listen port
    #[arg(short = 'P', long, default_value = "8000")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Shelter prediction service");

    let mut config = ServiceConfig::load(&cli.config)?;
    if let Some(model_path) = cli.model_path {
        config.model_path = model_path;
    }
    if let Some(data_dir) = cli.data_dir {
        config.store.get_or_insert_with(StoreConfig::default).data_dir = data_dir;
    }
    info!("Model artifact: {:?}", config.model_path);

    let metrics_handle = init_metrics()?;

    let state = AppState::from_config(config, Some(metrics_handle));
    if !state.model_loaded() {
        warn!("Running in degraded mode: every prediction returns the default probability");
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.listen, cli.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("shelter=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelter=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "shelter_predictions_total",
        "Total number of successful predictions by endpoint"
    );
    metrics::describe_counter!(
        "shelter_prediction_errors_total",
        "Total number of failed predictions by endpoint and kind"
    );
    metrics::describe_histogram!(
        "shelter_inference_latency_us",
        metrics::Unit::Microseconds,
        "Pipeline inference latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
