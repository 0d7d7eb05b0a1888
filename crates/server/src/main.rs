use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use uuid::Uuid;

use pinboard_server::api::{AppState, router};
use pinboard_server::config::PinboardConfig;
use pinboard_server::service::CardService;
use pinboard_server::session::SessionSigner;
use pinboard_store::{JsonlCardStore, UploadStore};

/// Pinboard card board HTTP server.
#[derive(Parser, Debug)]
#[command(name = "pinboard-server", about = "HTTP server for the Pinboard card board")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "pinboard.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from the TOML file, or use defaults if it does not
    // exist; environment variables override file-provided secrets.
    let mut config: PinboardConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        PinboardConfig::default()
    };
    config.apply_env_overrides();

    pinboard_server::telemetry::init();

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);

    // Storage directories must exist before the first request.
    std::fs::create_dir_all(&config.storage.data_dir)?;
    std::fs::create_dir_all(&config.storage.uploads_dir)?;

    let admin_password: Option<Arc<str>> = match config.admin.password {
        Some(ref password) if !password.is_empty() => Some(Arc::from(password.as_str())),
        _ => {
            warn!("no admin password configured, login is disabled and the board is read-only");
            None
        }
    };

    let session_secret = config.session.secret.unwrap_or_else(|| {
        warn!("no session secret configured, admin sessions will not survive restarts");
        format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
    });

    let store = Arc::new(JsonlCardStore::new(&config.storage.data_dir));
    let uploads = Arc::new(UploadStore::new(&config.storage.uploads_dir));
    let service = Arc::new(CardService::new(
        Arc::clone(&store) as Arc<dyn pinboard_store::CardStore>,
        Arc::clone(&uploads),
        config.limits.max_upload_bytes,
    ));
    let sessions = Arc::new(SessionSigner::new(
        &session_secret,
        config.session.ttl_seconds,
    ));

    let state = AppState {
        service,
        uploads,
        sessions,
        admin_password,
        max_upload_bytes: config.limits.max_upload_bytes,
    };
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %addr,
        card_log = %store.path().display(),
        "pinboard-server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("pinboard-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
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
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
