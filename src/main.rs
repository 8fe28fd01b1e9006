//! txweb main entry point

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use txweb_api::start_server;
use txweb_config::{Config, ConfigError};
use txweb_core::{HttpTransactionService, Shell};

#[derive(Parser, Debug)]
#[command(name = "txweb")]
#[command(author = "txweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight web console for transaction records", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

/// Load the configuration; a missing file means defaults
fn load_config(path: &PathBuf) -> anyhow::Result<(Config, bool)> {
    match Config::load(path) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::FileNotFound { .. }) => Ok((Config::default(), false)),
        Err(e) => Err(anyhow::anyhow!("Failed to load configuration:\n{}", e.to_details())),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, found) = load_config(&args.config)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if found {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!("Config file not found: {}, using defaults", args.config.display());
    }
    log::info!("Backend: {}", config.backend.base_url);

    let rt = Runtime::new()?;
    rt.block_on(async {
        let service = Arc::new(HttpTransactionService::from_config(&config.backend));
        let shell = Arc::new(Shell::new(service));

        match shell.refresh().await {
            Ok(count) => log::info!("Loaded {} transactions", count),
            Err(e) => log::warn!("Initial load failed, the page will show an empty list: {}", e),
        }

        start_server(config, shell).await
    })
}
