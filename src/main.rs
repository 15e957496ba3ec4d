//! Webshot server
//!
//! Binds the HTTP endpoint layer and keeps the shared browser alive until
//! a shutdown signal arrives; the browser is closed before the process
//! exits.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use webshot::browser::BrowserConfig;
use webshot::handlers::{self, AppState};

/// Webshot server
#[derive(Parser, Debug)]
#[command(name = "webshot")]
#[command(version)]
#[command(about = "Render URLs in headless Chromium and download the result")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Directory holding the frontend assets
    #[arg(long, default_value = "public")]
    assets: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "webshot=debug,info"
    } else {
        "info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut builder = BrowserConfig::builder();
    if let Some(ref path) = args.chrome_path {
        builder = builder.chrome_path(path);
    }
    let state = Arc::new(AppState::new(builder.build()));

    let app = handlers::router(state.clone(), &args.assets);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;

    info!("Server is running on {}:{}", args.host, args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // The browser must be confirmed closed before the process exits
    info!("Shutting down gracefully...");
    if let Err(e) = state.browser().shutdown().await {
        error!("Browser shutdown failed: {}", e);
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
