//! Classroom - school records service for teachers and their students

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use classroom_api::{AppState, create_router};
use classroom_auth::TokenService;
use classroom_db::Database;
use classroom_notify::{
    Dispatcher, LogNotifier, Notifier, RecipientPolicy, WebhookConfig, WebhookNotifier,
};
use config::{Config, LoggingConfig, NotificationConfig};

/// Classroom - school records service for teachers and their students
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "CLASSROOM_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "CLASSROOM_PORT")]
    port: Option<u16>,

    /// Secret used to sign identity tokens
    #[arg(long, env = "CLASSROOM_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }

    init_logging(&config.logging);

    info!("Starting Classroom v{}", env!("CARGO_PKG_VERSION"));

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    // Create the database directory if needed
    if let Some(parent) = std::path::Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    if config.uses_default_secret() {
        warn!("Using the default JWT secret; set auth.jwt_secret or CLASSROOM_JWT_SECRET");
    }
    let tokens = Arc::new(TokenService::new(&config.auth.jwt_secret));

    let notifications = build_dispatcher(&config.notification)?;

    let state = AppState::new(db, tokens, notifications);

    let app = create_router(state, Some(metrics_handle)).layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind_addr, port))?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Build the notification dispatcher from configuration
fn build_dispatcher(config: &NotificationConfig) -> Result<Dispatcher> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => {
            info!("Account notices are relayed to {}", url);
            Arc::new(WebhookNotifier::new(WebhookConfig {
                url: url.clone(),
                sender: config.sender.clone(),
                timeout,
            })?)
        }
        None => {
            warn!("No notification relay configured; account notices are only logged");
            Arc::new(LogNotifier)
        }
    };

    Ok(Dispatcher::new(
        notifier,
        RecipientPolicy::new(config.allowed_domains.iter().cloned()),
        timeout,
    ))
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
