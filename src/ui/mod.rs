//! Terminal User Interface components for progress-tui.

pub mod card;
pub mod chart;
pub mod forms;
mod help;
pub mod history;
pub mod scrollbar;
pub mod theme;
pub mod widgets;

pub use help::HelpOverlay;
