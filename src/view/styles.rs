//! Timeline colour scheme.
//!
//! Era bands alternate between two dim backgrounds; cards stand out on top of
//! them, with books in progress highlighted.

use crate::model::{Book, ReadingStatus};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether colours should be used at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colours are on unless `NO_COLOR` is set (to any value).
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Explicit setting.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== TimelineStyles =====

/// Styles for every element of the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineStyles {
    bands: [Style; 2],
    band_label: Style,
    axis: Style,
    card: Style,
    card_reading: Style,
    card_era: Style,
    /// Status bar.
    pub status: Style,
    /// Sidebar heading.
    pub sidebar_title: Style,
    /// Secondary sidebar text.
    pub sidebar_dim: Style,
}

impl TimelineStyles {
    /// Styles honouring `NO_COLOR`.
    pub fn new() -> Self {
        Self::with_color_config(ColorConfig::from_env())
    }

    /// Styles for an explicit colour setting. Without colour only text
    /// modifiers remain.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        if !config.colors_enabled() {
            return Self {
                bands: [Style::default(); 2],
                band_label: bold,
                axis: Style::default(),
                card: Style::default().add_modifier(Modifier::REVERSED),
                card_reading: bold.add_modifier(Modifier::REVERSED),
                card_era: Style::default().add_modifier(Modifier::REVERSED),
                status: Style::default().add_modifier(Modifier::REVERSED),
                sidebar_title: bold,
                sidebar_dim: Style::default().add_modifier(Modifier::DIM),
            };
        }

        Self {
            bands: [
                Style::default().bg(Color::Indexed(235)),
                Style::default().bg(Color::Indexed(237)),
            ],
            band_label: Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::DarkGray),
            card: Style::default().fg(Color::White).bg(Color::Blue),
            card_reading: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            card_era: Style::default().fg(Color::Gray).bg(Color::Blue),
            status: Style::default().fg(Color::Black).bg(Color::Gray),
            sidebar_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            sidebar_dim: Style::default().fg(Color::DarkGray),
        }
    }

    /// Background of the band at `index` (bands alternate).
    pub fn band(&self, index: usize) -> Style {
        self.bands[index % self.bands.len()]
    }

    /// Band name.
    pub fn band_label(&self) -> Style {
        self.band_label
    }

    /// Year ticks.
    pub fn axis(&self) -> Style {
        self.axis
    }

    /// Card title line for a book.
    pub fn card_title(&self, book: &Book) -> Style {
        match book.reading_status {
            ReadingStatus::CurrentlyReading => self.card_reading,
            ReadingStatus::Read => self.card,
        }
    }

    /// Card era line for a book.
    pub fn card_era(&self, book: &Book) -> Style {
        match book.reading_status {
            ReadingStatus::CurrentlyReading => self.card_reading.remove_modifier(Modifier::BOLD),
            ReadingStatus::Read => self.card_era,
        }
    }
}

impl Default for TimelineStyles {
    fn default() -> Self {
        Self::new()
    }
}
