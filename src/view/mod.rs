//! View state for tracker cards, independent of the terminal.
//!
//! Geometry is computed in logical pixels; the UI layer maps terminal cells
//! onto them with [`CELL_WIDTH_PX`] and [`CELL_HEIGHT_PX`].

pub mod chart;
pub mod context;
pub mod frame;
pub mod history;
pub mod scroll;

pub use context::{CardGeometry, TrackerContext};
pub use frame::{FrameQueue, FrameTask};

/// Logical pixels covered by one terminal column
pub const CELL_WIDTH_PX: f64 = 16.0;

/// Logical pixels covered by one terminal row
pub const CELL_HEIGHT_PX: f64 = 32.0;

pub fn cols_to_px(cols: u16) -> f64 {
    f64::from(cols) * CELL_WIDTH_PX
}

pub fn rows_to_px(rows: u16) -> f64 {
    f64::from(rows) * CELL_HEIGHT_PX
}

/// Column containing the logical x position
pub fn px_to_col(px: f64) -> u16 {
    (px / CELL_WIDTH_PX).floor().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Rows needed to show a logical height, rounded to the nearest row
pub fn px_to_rows(px: f64) -> u16 {
    (px / CELL_HEIGHT_PX).round().clamp(1.0, f64::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversions() {
        assert_eq!(cols_to_px(40), 640.0);
        assert_eq!(rows_to_px(9), 288.0);
        assert_eq!(px_to_col(31.9), 1);
        assert_eq!(px_to_rows(220.0), 7);
        assert_eq!(px_to_rows(480.0), 15);
        assert_eq!(px_to_rows(0.0), 1);
    }
}
