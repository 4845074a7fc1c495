//! Year/pixel mapping.
//!
//! Pure conversions between signed calendar years (negative = BCE) and
//! horizontal pixel offsets at a given density. Offsets are measured from the
//! timeline's configured start year; nothing clamps to the end year, so years
//! outside the bounds map to negative or past-the-end offsets.

use chrono::Datelike;

/// First year shown on the timeline (3000 BCE).
pub const TIMELINE_START_YEAR: i32 = -3000;

/// Current calendar year (UTC), the default last year of the timeline.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Finite span of years the timeline renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineBounds {
    /// First year (inclusive).
    pub start_year: i32,
    /// Last year (inclusive).
    pub end_year: i32,
}

impl Default for TimelineBounds {
    fn default() -> Self {
        Self {
            start_year: TIMELINE_START_YEAR,
            end_year: current_year(),
        }
    }
}

impl TimelineBounds {
    /// Bounds from explicit years.
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    /// Pixel offset of `year` within these bounds.
    pub fn year_to_pixel(&self, year: i32, pixels_per_year: f64) -> f64 {
        year_to_pixel(year, self.start_year, self.end_year, pixels_per_year)
    }

    /// Year under a pixel offset within these bounds.
    pub fn pixel_to_year(&self, pixel: f64, pixels_per_year: f64) -> i32 {
        pixel_to_year(pixel, self.start_year, pixels_per_year)
    }

    /// Total rendered width of the span.
    pub fn width(&self, pixels_per_year: f64) -> f64 {
        self.year_to_pixel(self.end_year, pixels_per_year)
    }
}

/// Pixel offset of `year` relative to `start_year`.
///
/// `end_year` is accepted so call sites name the whole timeline they map
/// into, but the mapping is affine in `start_year` alone.
pub fn year_to_pixel(year: i32, start_year: i32, end_year: i32, pixels_per_year: f64) -> f64 {
    let _ = end_year;
    (f64::from(year) - f64::from(start_year)) * pixels_per_year
}

/// Year under `pixel`, rounded to the nearest whole year.
///
/// Half years round up (towards the present) on both sides of year zero.
pub fn pixel_to_year(pixel: f64, start_year: i32, pixels_per_year: f64) -> i32 {
    (pixel / pixels_per_year + f64::from(start_year) + 0.5).floor() as i32
}

/// Axis label for a year.
///
/// Positive years print as-is. Negative years print as "N BCE"; year 0 has
/// no calendar counterpart and prints as "1 BCE".
pub fn format_year(year: i32) -> String {
    match year {
        y if y > 0 => y.to_string(),
        0 => "1 BCE".to_string(),
        y => format!("{} BCE", y.unsigned_abs()),
    }
}

/// Width of the default timeline (3000 BCE to the current year).
pub fn timeline_width(pixels_per_year: f64) -> f64 {
    TimelineBounds::default().width(pixels_per_year)
}
