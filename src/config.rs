//! Tunable settings loaded from an optional TOML file.
//!
//! ```toml
//! [chart]
//! min_height = 220
//! max_height = 480
//!
//! [scrollbar]
//! step_px = 200
//! hold_interval_ms = 18
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// All tunables, grouped by component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chart: ChartSettings,
    pub scrollbar: ScrollbarSettings,
    pub table: TableSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Logical pixels
    pub min_height: f64,
    /// Logical pixels
    pub max_height: f64,
    pub max_visible_ticks: usize,
    /// Physical pixels per logical pixel of the drawing surface
    pub dpr: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            min_height: 220.0,
            max_height: 480.0,
            max_visible_ticks: 8,
            dpr: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarSettings {
    /// Distance moved per arrow tap
    pub step_px: f64,
    /// Repeat interval while an arrow is held
    pub hold_interval_ms: u64,
    pub min_thumb_px: f64,
    /// Horizontal distance per mouse wheel notch over the chart
    pub wheel_step_px: f64,
}

impl Default for ScrollbarSettings {
    fn default() -> Self {
        ScrollbarSettings {
            step_px: 200.0,
            hold_interval_ms: 18,
            min_thumb_px: 28.0,
            wheel_step_px: 64.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub visible_rows: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings { visible_rows: 5 }
    }
}

impl Settings {
    /// Default location: `<config_dir>/progress-tui/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("progress-tui").join("config.toml"))
    }

    /// Load settings from `path`. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(raw)?;
        if settings.chart.min_height > settings.chart.max_height {
            anyhow::bail!(
                "chart.min_height ({}) exceeds chart.max_height ({})",
                settings.chart.min_height,
                settings.chart.max_height
            );
        }
        if settings.chart.dpr <= 0.0 {
            anyhow::bail!("chart.dpr must be positive");
        }
        if settings.table.visible_rows == 0 {
            anyhow::bail!("table.visible_rows must be at least 1");
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.table.visible_rows, 5);
        assert_eq!(settings.scrollbar.hold_interval_ms, 18);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::parse("[scrollbar]\nstep_px = 120.0\n").unwrap();
        assert_eq!(settings.scrollbar.step_px, 120.0);
        assert_eq!(settings.scrollbar.min_thumb_px, 28.0);
        assert_eq!(settings.chart, ChartSettings::default());
    }

    #[test]
    fn test_invalid_heights_rejected() {
        let err = Settings::parse("[chart]\nmin_height = 500.0\nmax_height = 100.0\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_zero_visible_rows_rejected() {
        let err = Settings::parse("[table]\nvisible_rows = 0\n").unwrap_err();
        assert!(err.to_string().contains("visible_rows"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[table]\nvisible_rows = 8\n").unwrap();
        assert_eq!(Settings::load(&path).unwrap().table.visible_rows, 8);
    }
}
