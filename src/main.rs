//! Standalone raw-response mock server.
//!
//! Serves the routes listed in a TOML manifest until Ctrl+C.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use raw_mock::config::load_manifest;
use raw_mock::lifecycle::signals::shutdown_signal;
use raw_mock::net::load_tls_config;
use raw_mock::observability::logging;
use raw_mock::MockServer;

#[derive(Parser)]
#[command(name = "raw-mock")]
#[command(about = "Replay captured HTTP responses on matching routes", long_about = None)]
struct Cli {
    /// Path to the TOML manifest.
    #[arg(short, long)]
    config: PathBuf,

    /// Override the manifest's bind address.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);

    let cli = Cli::parse();
    tracing::info!(config = ?cli.config, "raw-mock v{} starting", env!("CARGO_PKG_VERSION"));

    let (config, routes) = load_manifest(&cli.config)?;
    let bind_address = match cli.bind {
        Some(addr) => addr,
        None => config.listener.bind_address.parse()?,
    };

    let mut server = MockServer::unstarted(routes)?;
    server.set_bind_address(bind_address)?;

    match &config.listener.tls {
        Some(tls) => {
            let tls_config = load_tls_config(&tls.cert_path, &tls.key_path).await?;
            server.start_tls(tls_config)?;
        }
        None => server.start()?,
    }

    for route in server.get_routes()? {
        tracing::info!("{}", route);
    }
    tracing::info!(url = server.url().unwrap_or_default(), "Listening for connections");

    shutdown_signal().await;
    server.close();

    tracing::info!("Shutdown complete");
    Ok(())
}
