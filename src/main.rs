//! Users service CLI
//!
//! ```sh
//! # Run with default config (~/.config/users-service/config.toml)
//! users-service
//!
//! # Custom config path, in-memory storage, port override
//! users-service --config ./config.toml --storage memory --port 8081
//!
//! # Validate config without starting
//! users-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use users_api::config::{AppConfig, StorageBackend};
use users_api::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "users-service",
    version,
    about = "CRUD REST service for users",
    long_about = "Users REST resource with paging, sorting and localized validation errors.\n\n\
                  Default config: ~/.config/users-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "USERS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the storage backend.
    #[arg(long, value_enum)]
    storage: Option<StorageBackend>,

    /// Restore the 20 seed users on startup.
    #[arg(long)]
    reset: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(users_api::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            return Err(e.into());
        }
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(storage) = cli.storage {
        config.database.backend = storage;
    }
    if cli.reset {
        config.seed.reset_on_start = true;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Storage     : {:?}", config.database.backend);
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        println!("   Locale      : {:?}", config.validation.default_locale);
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => error!("Failed to load config: {}. Using defaults.", e),
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
