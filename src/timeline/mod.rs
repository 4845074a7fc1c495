//! Timeline layout engine.
//!
//! [`scale`] maps years to pixels, [`stack`] resolves book cards into
//! non-overlapping rows and [`axis`] computes ticks and background bands.
//! Everything here is pure and recomputed on every layout request.

pub mod axis;
pub mod scale;
pub mod stack;

pub use axis::{axis_ticks, band_geometry, jump_points, AxisTick, BandGeometry, JumpPoint};
pub use scale::{
    current_year, format_year, pixel_to_year, timeline_width, year_to_pixel, TimelineBounds,
    TIMELINE_START_YEAR,
};
pub use stack::{row_count, stack_books, RowStacker, StackedBook, CARD_GAP, MIN_CARD_WIDTH};
