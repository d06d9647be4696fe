//! Command-line interface argument parsing for progress-tui.
//!
//! - `progress-tui show`
//! - `progress-tui show --data-dir ./trackers`
//! - `progress-tui show --config ./config.toml --dpr 2`

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

/// A terminal progress tracker with scrollable charts.
#[derive(Parser, Debug)]
#[command(name = "progress-tui")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the tracker dashboard
    Show {
        /// Directory holding the tracker database and log file
        /// Defaults to the platform data directory (e.g. ~/.local/share/progress-tui/)
        #[arg(long)]
        data_dir: Option<String>,

        /// Path to a TOML settings file
        /// Defaults to the platform config directory (e.g. ~/.config/progress-tui/config.toml)
        #[arg(short, long)]
        config: Option<String>,

        /// Log level written to the log file (overridden by RUST_LOG)
        #[arg(long, default_value = "info")]
        log_level: String,

        /// Device pixel ratio for the chart drawing surface
        #[arg(long)]
        dpr: Option<f64>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments and the settings file
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub settings: Settings,
}

impl AppConfig {
    /// Create AppConfig from the `show` command.
    ///
    /// Precedence: CLI flags, then the settings file, then built-in defaults.
    pub fn from_show_command(
        data_dir: Option<String>,
        config: Option<String>,
        log_level: String,
        dpr: Option<f64>,
    ) -> Result<Self> {
        let data_dir = data_dir.map(PathBuf::from).unwrap_or_else(|| {
            // Check PROGRESS_TUI_DIR environment variable first
            if let Ok(dir) = std::env::var("PROGRESS_TUI_DIR") {
                PathBuf::from(dir)
            } else {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("progress-tui")
            }
        });

        let mut settings = match config.map(PathBuf::from).or_else(Settings::default_path) {
            Some(path) => Settings::load(&path)?,
            None => Settings::default(),
        };

        if let Some(dpr) = dpr {
            if dpr <= 0.0 {
                anyhow::bail!("--dpr must be positive, got {dpr}");
            }
            settings.chart.dpr = dpr;
        }

        Ok(AppConfig {
            data_dir,
            log_level,
            settings,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("storage.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("progress-tui.log")
    }
}
