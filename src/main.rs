//! docqa HTTP server entry point
//!
//! Starts the REST API server for the document Q&A service.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docqa::core::config::Config;
use docqa::core::services::Services;
use docqa::core::xdg::XdgDirs;
use docqa::http;

#[derive(Parser, Debug)]
#[command(name = "docqa", version, about = "Retrieval-augmented document Q&A service")]
struct Args {
    /// Path to a TOML configuration file (overrides discovery)
    #[arg(long, env = "DOCQA_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides configuration)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting docqa service");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    // Load configuration
    let mut config = Config::load_with(args.config.as_deref(), &xdg)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.log_config();

    // Create shared services
    let services = Arc::new(Services::new(config.clone())?);

    // Build the API router
    let app = http::router(Arc::clone(&services));

    // Bind to address and start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/health", addr);

    // Serve the application
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
