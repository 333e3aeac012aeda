use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use shareit::config::{self, CliArgs, Config, LogFormat};
use shareit::{create_app, db, run_migrations};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber
///
/// Logs go to stdout in the configured format and, when a log directory is
/// set, also to a daily-rolling JSON file. The returned guard must be held
/// until shutdown or buffered file lines are lost.
fn init_logging(config: &Config, debug: bool) -> Result<Option<WorkerGuard>> {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(match config.log_format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Human => fmt::layer().boxed(),
    });

    let guard = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "shareit.log"));
            layers.push(fmt::layer().json().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let debug = args.debug;
    let config = config::get_config(args).map_err(anyhow::Error::msg)?;

    let _guard = init_logging(&config, debug)?;
    info!(
        database_url = %config.database_url,
        bind = %config.bind_address(),
        log_format = %config.log_format,
        log_dir = ?config.log_dir,
        "Starting ShareIt server"
    );

    let pool = db::init_pool(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    {
        let mut conn = pool.get().context("Failed to get a database connection")?;
        run_migrations(&mut conn)?;
    }

    let app = create_app(Arc::new(pool));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");

    Ok(())
}
