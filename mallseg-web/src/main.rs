//! mallseg-web - Mall customer segmentation service
//!
//! Serves the customer form and the operator dashboard. The classifier for
//! the configured revision is built once before the listener binds; any
//! dataset or fitting error stops startup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mallseg_common::config::{CliOverrides, ServiceConfig};
use mallseg_common::{build_classifier, Revision};
use mallseg_web::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mallseg-web
#[derive(Parser, Debug)]
#[command(name = "mallseg-web")]
#[command(about = "Mall customer segmentation web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Classifier revision: rules, kmeans5 or kmeans6
    #[arg(short, long)]
    revision: Option<Revision>,

    /// Reference dataset CSV for clustering revisions
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "MALLSEG_CONFIG")]
    config: Option<PathBuf>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        CliOverrides {
            bind: args.bind,
            port: args.port,
            revision: args.revision,
            dataset: args.dataset,
            config_file: args.config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: CliOverrides = Args::parse().into();
    let config = ServiceConfig::resolve(&cli).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "mallseg_web={level},mallseg_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mallseg-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Classifier revision: {}", config.revision);
    if config.revision.clusters().is_some() {
        info!("Reference dataset: {}", config.dataset.display());
    }

    let classifier = build_classifier(config.revision, &config.dataset, config.cluster_options())
        .with_context(|| format!("Failed to build {} classifier", config.revision))?;

    if let Some(k) = config.revision.clusters() {
        info!(
            "✓ Classifier ready ({} clusters, {} reference rows labelled)",
            k,
            classifier.reference_table().len()
        );
    } else {
        info!("✓ Classifier ready (rule table)");
    }

    let app = build_router(AppState::new(classifier));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mallseg-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
