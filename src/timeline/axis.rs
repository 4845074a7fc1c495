//! Axis furniture: year ticks, era background bands and jump points.

use crate::timeline::{format_year, TimelineBounds};

/// Density at or above which ticks switch from every 500 to every 100 years.
const FINE_TICK_DENSITY: f64 = 4.0;

/// One labelled tick on the year axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Calendar year of the tick.
    pub year: i32,
    /// Pixel offset.
    pub x: f64,
    /// Display label, e.g. "500 BCE".
    pub label: String,
}

/// Tick spacing in years for a density.
pub fn tick_interval(pixels_per_year: f64) -> i32 {
    if pixels_per_year >= FINE_TICK_DENSITY {
        100
    } else {
        500
    }
}

/// Ticks at every multiple of the interval inside `bounds`.
pub fn axis_ticks(bounds: &TimelineBounds, pixels_per_year: f64) -> Vec<AxisTick> {
    let interval = tick_interval(pixels_per_year);
    let first = first_multiple_at_or_after(bounds.start_year, interval);

    (first..=bounds.end_year)
        .step_by(interval as usize)
        .map(|year| AxisTick {
            year,
            x: bounds.year_to_pixel(year, pixels_per_year),
            label: format_year(year),
        })
        .collect()
}

fn first_multiple_at_or_after(year: i32, interval: i32) -> i32 {
    let rem = year.rem_euclid(interval);
    if rem == 0 {
        year
    } else {
        year + (interval - rem)
    }
}

/// A named background period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraBand {
    /// Period name.
    pub label: &'static str,
    /// First year.
    pub start: i32,
    /// Last year; `None` runs to the end of the timeline.
    pub end: Option<i32>,
}

/// Background periods, oldest first.
#[rustfmt::skip]
pub const ERA_BANDS: [EraBand; 7] = [
    EraBand { label: "Ancient", start: -3000, end: Some(-500) },
    EraBand { label: "Classical", start: -500, end: Some(500) },
    EraBand { label: "Medieval", start: 500, end: Some(1400) },
    EraBand { label: "Renaissance", start: 1400, end: Some(1700) },
    EraBand { label: "Industrial", start: 1700, end: Some(1900) },
    EraBand { label: "Modern", start: 1900, end: Some(1945) },
    EraBand { label: "Contemporary", start: 1945, end: None },
];

/// An era band projected onto pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BandGeometry {
    /// Period name.
    pub label: &'static str,
    /// Left edge in pixels.
    pub x: f64,
    /// Width in pixels.
    pub width: f64,
}

/// Project [`ERA_BANDS`] onto pixels.
pub fn band_geometry(bounds: &TimelineBounds, pixels_per_year: f64) -> Vec<BandGeometry> {
    ERA_BANDS
        .iter()
        .map(|band| {
            let x = bounds.year_to_pixel(band.start, pixels_per_year);
            let end = band.end.unwrap_or(bounds.end_year);
            BandGeometry {
                label: band.label,
                x,
                width: bounds.year_to_pixel(end, pixels_per_year) - x,
            }
        })
        .collect()
}

/// A named year the viewer can jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpPoint {
    /// Button label.
    pub label: &'static str,
    /// Target year.
    pub year: i32,
}

/// Jump points, oldest first. The last one is the end of the timeline.
#[rustfmt::skip]
pub fn jump_points(bounds: &TimelineBounds) -> [JumpPoint; 5] {
    [
        JumpPoint { label: "Ancient", year: -2500 },
        JumpPoint { label: "Medieval", year: 900 },
        JumpPoint { label: "Industrial", year: 1800 },
        JumpPoint { label: "WWII", year: 1939 },
        JumpPoint { label: "Present", year: bounds.end_year },
    ]
}
