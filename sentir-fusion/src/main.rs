//! sentir-fusion - Main entry point
//!
//! Serves the fusion engine over HTTP.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sentir_common::config::{load_config, resolve_config_source, CONFIG_ENV_VAR};
use sentir_fusion::config::ServiceConfig;
use sentir_fusion::{build_router, AppState, FusionEngine};
use tokio::signal;
use tracing::info;

/// Command-line arguments for sentir-fusion
#[derive(Parser, Debug)]
#[command(name = "sentir-fusion")]
#[command(about = "Multi-source text sentiment and emotion fusion service")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overrides the config file
    #[arg(long, env = "SENTIR_HOST")]
    host: Option<String>,

    /// Port to listen on, overrides the config file
    #[arg(short, long, env = "SENTIR_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let source = resolve_config_source(args.config.as_deref(), CONFIG_ENV_VAR);
    let mut config: ServiceConfig = load_config(&source).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    sentir_common::logging::init(&config.logging).context("Failed to initialize logging")?;
    info!(source = ?source, "Configuration resolved");

    let engine = FusionEngine::from_config(config.engine).context("Failed to initialize fusion engine")?;
    info!(providers = ?engine.registry().names(), "Fusion engine initialized");

    let app = build_router(AppState::new(engine));

    let addr = listen_addr(&config.server.host, config.server.port)?;

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Bind address from a bare or bracketed IP host and a port
fn listen_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .with_context(|| format!("Invalid listen host: {}", host))?;
    Ok(SocketAddr::new(ip, port))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_accepts_ipv4_and_ipv6() {
        assert_eq!(listen_addr("127.0.0.1", 5740).unwrap().to_string(), "127.0.0.1:5740");
        assert_eq!(listen_addr("::1", 5740).unwrap().to_string(), "[::1]:5740");
        assert_eq!(listen_addr("[::]", 80).unwrap().to_string(), "[::]:80");
    }

    #[test]
    fn test_listen_addr_rejects_hostnames() {
        assert!(listen_addr("localhost", 5740).is_err());
        assert!(listen_addr("127.0.0.1:5740", 5740).is_err());
    }
}
