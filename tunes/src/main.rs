//! tunes - search the catalog, pick a tune and a setting, view it as a PDF
//!
//! Usage:
//!   tunes                        # empty search
//!   tunes Farewell to Ireland    # search directly
//!   tunes --popular              # start from the popular list
//!
//! Exit codes: 0 on success, the picker's own code when it is cancelled,
//! 1 on any error.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tunes::catalog_client::CatalogClient;
use tunes::render::RenderPipeline;
use tunes::selection::CommandPicker;
use tunes::{SessionOutcome, TuneSession, TuneSource};
use tunes_common::config::{ConfigSource, TomlConfig};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tunes")]
#[command(about = "Find a tune and display one of its settings")]
#[command(version)]
struct Args {
    /// Start from the popular-tunes list instead of a search
    #[arg(long)]
    popular: bool,

    /// Configuration file (default: <config dir>/tunes/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search words, joined with spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,
}

impl Args {
    fn tune_source(&self) -> TuneSource {
        if self.popular {
            TuneSource::Popular
        } else {
            TuneSource::Search(self.query.join(" "))
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("tunes: {:#}", e);
            1
        }
    };

    std::process::exit(code);
}

async fn run(args: Args) -> Result<i32> {
    let (config, source) =
        TomlConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging.level);

    info!("tunes v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
        ConfigSource::Defaults => debug!("No config file found, using compiled defaults"),
    }

    let catalog =
        CatalogClient::new(&config.catalog).context("Failed to create catalog client")?;
    let picker = CommandPicker::new(config.picker.command.clone());
    let renderer = RenderPipeline::new(config.render.clone());
    let session = TuneSession::new(catalog, picker, config.picker.clone(), renderer);

    match session.run(args.tune_source()).await? {
        SessionOutcome::Displayed { tune, .. } => {
            info!(name = %tune.name, "Displayed");
            Ok(0)
        }
        SessionOutcome::Cancelled(code) => {
            info!(code, "Picker cancelled");
            Ok(code)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` takes precedence over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tunes={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
