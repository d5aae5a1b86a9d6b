//! Users CRUD API entry point.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use usuarios_api::api::{create_router, AppState};
use usuarios_api::config::Config;
use usuarios_api::error::AppError;
use usuarios_api::metrics;
use usuarios_api::store::{MySqlUserRepository, Store};
use usuarios_api::utils::{install_panic_logger, shutdown_signal};

/// Minimal CRUD HTTP API over a MySQL users table.
#[derive(Parser, Debug)]
#[command(name = "usuarios-api")]
#[command(about = "CRUD HTTP API for the usuarios table")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP port; overrides PORT.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Attempt the store connection once and report the result.
    CheckDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("usuarios_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    install_panic_logger();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::CheckDb) => cmd_check_db().await,
        Some(Command::Serve { port }) => cmd_serve(port).await,
        None => cmd_serve(None).await,
    }
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(AppError::InvalidConfig(e).into());
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("USUARIOS API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Store: {}", config.database.display_target());
    println!(
        "  Password: {}",
        if config.database.password.is_empty() { "(empty)" } else { "(set)" }
    );
    println!("  Connect timeout: {}s", config.database.connect_timeout_secs);
    println!("  HTTP port: {}", config.server.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Attempt the store connection once.
async fn cmd_check_db() -> anyhow::Result<()> {
    let config = load_config()?;

    println!("Connecting to {}... ", config.database.display_target());
    match MySqlUserRepository::connect(&config.database).await {
        Ok(repo) => {
            repo.close().await;
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            Err(anyhow::anyhow!("Store connection failed"))
        }
    }
}

/// Run the HTTP server.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    let mut app_state = AppState::new(Store::connect(&config.database).await);
    if !app_state.store.is_connected() {
        warn!("Store unavailable; user endpoints will fail until restart");
    }

    match metrics::install_prometheus_recorder() {
        Ok(handle) => {
            metrics::init_metrics();
            let upkeep = handle.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(5));
                loop {
                    interval.tick().await;
                    upkeep.run_upkeep();
                }
            });
            app_state = app_state.with_metrics(handle);
        }
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
