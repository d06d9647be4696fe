//! progress-tui: a terminal progress tracker.
//!
//! Each tracker is a dated series of positive results in one unit, shown as
//! a card with a horizontally scrollable chart, a custom scrollbar and a
//! history table.

mod app;
mod cli;
mod config;
mod data;
mod form;
mod logging;
mod ui;
mod view;

use anyhow::Result;
use cli::{AppConfig, Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Show {
            data_dir,
            config,
            log_level,
            dpr,
        } => {
            let config = AppConfig::from_show_command(data_dir, config, log_level, dpr)?;

            // The TUI owns stdout, so logs go to a file
            logging::init(&config.log_path(), &config.log_level)?;
            tracing::info!(data_dir = %config.data_dir.display(), "starting progress-tui");

            // Run the TUI application
            app::run(config)?;
        }
    }

    Ok(())
}
