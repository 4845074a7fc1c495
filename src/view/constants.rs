//! Layout dimension constants for TUI rendering.
//!
//! Timeline geometry is computed in pixels; the terminal shows it at a fixed
//! number of pixels per column.

/// Timeline pixels per terminal column.
///
/// The default 96 px minimum card becomes 12 columns.
pub const CELL_WIDTH_PX: f64 = 8.0;

/// Line holding era band names.
pub const BAND_ROW_HEIGHT: u16 = 1;

/// Line holding year tick labels.
pub const AXIS_HEIGHT: u16 = 1;

/// Lines per card row: title, then era.
pub const CARD_HEIGHT: u16 = 2;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Width of the "no historical era" sidebar in columns (border included).
pub const SIDEBAR_WIDTH: u16 = 32;

/// Columns moved by one horizontal scroll step.
pub const SCROLL_STEP_COLUMNS: u16 = 8;

/// Fraction of the viewport, from the left, where the present year sits after
/// opening or jumping to the present.
pub const PRESENT_VIEWPORT_FRACTION: f64 = 0.75;
