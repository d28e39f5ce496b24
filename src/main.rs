mod api;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod events;
mod logging;
mod models;
mod session;
mod store;
mod transform;
mod ui;
mod workers;

use crate::api::{ApiClient, StatusPolicy};
use crate::config::{Config, ConfigOverrides, get_config_path};
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use crate::transform::DashboardView;
use crate::workers::fetcher::fetch_cycle;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
struct BackendArgs {
    /// Backend base URL, or `local` for http://localhost:8000
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Seconds between refresh cycles
    #[arg(long, value_name = "SECONDS")]
    interval_secs: Option<u64>,

    /// Number of ticks and extrinsics requested per cycle
    #[arg(long, value_name = "COUNT")]
    limit: Option<u32>,

    /// Whether non-2xx responses fail the cycle (`lenient` or `strict`)
    #[arg(long, value_name = "POLICY")]
    status_policy: Option<StatusPolicy>,

    /// Config file to use instead of ~/.shadow-realm/config.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl BackendArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            interval_secs: self.interval_secs,
            fetch_limit: self.limit,
            status_policy: self.status_policy,
        }
    }

    fn config_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(get_config_path()?),
        }
    }

    fn resolve(&self) -> Result<Config, Box<dyn Error>> {
        let path = self.config_path()?;
        config::resolve(&path, self.overrides()).map_err(|e| {
            crate::print_cmd_error!("Invalid configuration", &e.to_string());
            e.into()
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Start the dashboard
    Start {
        #[command(flatten)]
        backend: BackendArgs,

        /// Print events to the console instead of drawing the dashboard
        #[arg(long, action = clap::ArgAction::SetTrue)]
        headless: bool,

        /// Paint a dark background behind the dashboard
        #[arg(long, action = clap::ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Run a single refresh cycle and print the derived view as JSON
    Once {
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Save the effective settings, flags included, to the config file
    InitConfig {
        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    match args.command {
        Command::Start {
            backend,
            headless,
            with_background,
        } => {
            let config = backend.resolve()?;
            let session = setup_session(config).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session, with_background).await
            }
        }
        Command::Once { backend } => {
            let config = backend.resolve()?;
            once(&config).await
        }
        Command::InitConfig { backend } => {
            let config = backend.resolve()?;
            let path = backend.config_path()?;
            crate::print_cmd_info!("Saving configuration", "{}", path.display());
            config
                .save(&path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            crate::print_cmd_success!("Configuration saved", "backend {}", config.api_url);
            Ok(())
        }
    }
}

/// Runs one cycle outside the scheduler and prints the result.
async fn once(config: &Config) -> Result<(), Box<dyn Error>> {
    let environment = config.environment()?;
    let client = ApiClient::new(&environment.api_url(), config.status_policy)?;
    let snapshot = fetch_cycle(&client, config.fetch_limit)
        .await
        .map_err(|e| {
            crate::print_cmd_error!("Refresh failed", &e.to_string());
            e
        })?;
    let view = DashboardView::from_snapshot(&snapshot);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
