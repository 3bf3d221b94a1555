//! Binary crate for the `weather-dash` terminal dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive API-key configuration
//! - The ratatui dashboard shell

use clap::Parser;

mod app;
mod cli;
mod ui;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run()
}
