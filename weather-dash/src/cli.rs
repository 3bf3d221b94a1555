use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use weather_core::{Config, Units};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard")]
pub struct Cli {
    /// OpenWeather API key; overrides OPENWEATHER_API_KEY and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Directory holding favorites.json and history.csv.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Measurement units requested from the provider.
    #[arg(long, default_value = "metric")]
    pub units: Units,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        init_tracing();

        match self.command {
            Some(Command::Configure) => configure(),
            None => {
                let config = Config::load()?;
                let api_key = config.resolve_api_key(self.api_key.as_deref());
                let data_dir = config.resolve_data_dir(self.data_dir.as_deref())?;
                crate::app::run(api_key, &data_dir, self.units)
            }
        }
    }
}

/// Route tracing to stderr, honoring RUST_LOG; quiet by default so the
/// dashboard surface stays clean.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

/// Interactive `configure` flow: prompt for the key and persist it.
fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("failed to read API key")?;

    config.api_key = Some(key.trim().to_string());
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}
