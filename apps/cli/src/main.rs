mod args;
mod config;
mod scheduler;

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use app_api::AppContext;
use http_api::HttpState;
use ledger_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let config = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;
    init_tracing(&config.config.log_level);
    if config.created {
        info!(path = %config.paths.file.display(), "created default config");
    }

    let settings = config.config.ledger_settings();
    settings
        .validate()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    let paths = AppPaths::new(config.data_dir());
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;
    let db_path = args.db.clone().unwrap_or(paths.db_path);
    info!(db = %db_path.display(), "using ledger database");

    let app_state = AppState::new(AppConfig { db_path, settings });

    if args.rollback {
        match app_state
            .rollback_db()
            .map_err(|err| io::Error::other(err.to_string()))?
        {
            Some(revision) => println!("Reverted schema revision {revision}."),
            None => println!("No schema revision to revert."),
        }
        return Ok(());
    }

    app_state
        .setup_db()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {}", err)))?;

    if args.cleanup_once {
        let ledger = app_state.services.ledger.clone();
        let retention_days = settings.retention_days;
        let deleted =
            tokio::task::spawn_blocking(move || ledger.cleanup(retention_days)).await?;
        println!("Deleted {deleted} usage rows older than {retention_days} days.");
        return Ok(());
    }

    let interval_minutes = config.config.cleanup_interval_minutes;
    let cleanup_task = (interval_minutes > 0).then(|| {
        scheduler::spawn_cleanup(
            app_state.services.ledger.clone(),
            Duration::from_secs(interval_minutes * 60),
            settings.retention_days,
        )
    });

    let state = HttpState::new(AppContext { app_state });
    let router = http_api::router(state);

    let port = args.port.unwrap_or(config.config.port);
    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    if used_fallback {
        warn!(port, actual_port, "configured port was unavailable; using a free port");
    }

    info!(url = %format!("http://127.0.0.1:{actual_port}"), "usage ledger listening");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    info!("usage ledger stopped");

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
