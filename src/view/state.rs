//! Viewer state: scroll position, zoom and sidebar visibility.
//!
//! Horizontal position is kept in timeline pixels so that the pixel geometry
//! of the stacker and axis maps onto columns with a single division.

use crate::model::{KeyAction, ZoomLevel};
use crate::timeline::{jump_points, TimelineBounds};
use crate::view::constants::{CELL_WIDTH_PX, PRESENT_VIEWPORT_FRACTION, SCROLL_STEP_COLUMNS};
use tracing::debug;

/// Mutable state of the timeline viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    bounds: TimelineBounds,
    zoom: ZoomLevel,
    /// Pixel offset of the left viewport edge.
    scroll_px: f64,
    /// First card row shown.
    first_row: usize,
    /// Timeline viewport width in columns (sidebar excluded).
    viewport_cols: u16,
    sidebar_visible: bool,
}

impl ViewState {
    /// State for a viewport, opened on the present.
    pub fn new(bounds: TimelineBounds, zoom: ZoomLevel, viewport_cols: u16) -> Self {
        let mut state = Self {
            bounds,
            zoom,
            scroll_px: 0.0,
            first_row: 0,
            viewport_cols: viewport_cols.max(1),
            sidebar_visible: true,
        };
        state.scroll_to_present();
        state
    }

    /// Years on display.
    pub fn bounds(&self) -> &TimelineBounds {
        &self.bounds
    }

    /// Current zoom level.
    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    /// Density at the current zoom.
    pub fn pixels_per_year(&self) -> f64 {
        self.zoom.pixels_per_year()
    }

    /// Pixel offset of the left viewport edge.
    pub fn scroll_px(&self) -> f64 {
        self.scroll_px
    }

    /// First card row shown.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Whether the sidebar is requested.
    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    /// Viewport width in pixels.
    pub fn viewport_px(&self) -> f64 {
        f64::from(self.viewport_cols) * CELL_WIDTH_PX
    }

    /// Viewport column of a timeline pixel (may be negative or past the edge).
    pub fn column_of(&self, pixel: f64) -> i64 {
        ((pixel - self.scroll_px) / CELL_WIDTH_PX).floor() as i64
    }

    /// Year under the middle of the viewport.
    pub fn centre_year(&self) -> i32 {
        self.bounds
            .pixel_to_year(self.scroll_px + self.viewport_px() / 2.0, self.pixels_per_year())
    }

    /// Resize the viewport, keeping the left edge where possible.
    pub fn set_viewport(&mut self, viewport_cols: u16) {
        self.viewport_cols = viewport_cols.max(1);
        self.set_scroll(self.scroll_px);
    }

    /// Scrolling stops once the end of the timeline reaches the present marker.
    fn max_scroll(&self) -> f64 {
        let width = self.bounds.width(self.pixels_per_year());
        (width - self.viewport_px() * PRESENT_VIEWPORT_FRACTION).max(0.0)
    }

    fn set_scroll(&mut self, pixel: f64) {
        self.scroll_px = pixel.clamp(0.0, self.max_scroll());
    }

    /// Move the viewport by `delta` pixels.
    pub fn scroll_by(&mut self, delta: f64) {
        self.set_scroll(self.scroll_px + delta);
    }

    /// Show the start of the timeline.
    pub fn scroll_to_start(&mut self) {
        self.set_scroll(0.0);
    }

    /// Put the last year at [`PRESENT_VIEWPORT_FRACTION`] of the viewport.
    pub fn scroll_to_present(&mut self) {
        let present = self
            .bounds
            .year_to_pixel(self.bounds.end_year, self.pixels_per_year());
        self.set_scroll(present - self.viewport_px() * PRESENT_VIEWPORT_FRACTION);
    }

    /// Centre the viewport on `year`.
    pub fn jump_to_year(&mut self, year: i32) {
        let x = self.bounds.year_to_pixel(year, self.pixels_per_year());
        self.set_scroll(x - self.viewport_px() / 2.0);
    }

    /// Switch zoom, keeping the centre year in the centre.
    pub fn toggle_zoom(&mut self) {
        let centre = self.centre_year();
        self.zoom = self.zoom.toggle();
        self.jump_to_year(centre);
    }

    /// Move the first visible card row, staying within `total_rows`.
    pub fn scroll_rows(&mut self, delta: isize, total_rows: usize) {
        let last = total_rows.saturating_sub(1);
        self.first_row = self.first_row.saturating_add_signed(delta).min(last);
    }

    /// Apply a key action. Returns `true` when the viewer should close.
    pub fn apply(&mut self, action: KeyAction, total_rows: usize) -> bool {
        let step = f64::from(SCROLL_STEP_COLUMNS) * CELL_WIDTH_PX;
        match action {
            KeyAction::ScrollLeft => self.scroll_by(-step),
            KeyAction::ScrollRight => self.scroll_by(step),
            KeyAction::PageLeft => self.scroll_by(-self.viewport_px()),
            KeyAction::PageRight => self.scroll_by(self.viewport_px()),
            KeyAction::ScrollUp => self.scroll_rows(-1, total_rows),
            KeyAction::ScrollDown => self.scroll_rows(1, total_rows),
            KeyAction::ScrollToStart => self.scroll_to_start(),
            KeyAction::ScrollToPresent => self.scroll_to_present(),
            KeyAction::ToggleZoom => self.toggle_zoom(),
            KeyAction::JumpTo(index) => match jump_points(&self.bounds).get(index) {
                Some(point) => self.jump_to_year(point.year),
                None => debug!(index, "No jump point"),
            },
            KeyAction::ToggleSidebar => self.sidebar_visible = !self.sidebar_visible,
            KeyAction::Quit => return true,
        }
        false
    }
}
