//! Timeline widget: era bands, year axis and stacked book cards.
//!
//! Line 0 names the era bands, line 1 carries the year ticks and every
//! following pair of lines is one card row. Band backgrounds run the full
//! height so cards always sit on top of their period's colour.

use crate::timeline::{axis_ticks, band_geometry, StackedBook};
use crate::view::constants::{AXIS_HEIGHT, BAND_ROW_HEIGHT, CARD_HEIGHT};
use crate::view::helpers::truncate;
use crate::view::state::ViewState;
use crate::view::styles::TimelineStyles;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

/// Renders the visible slice of the timeline.
pub struct TimelineView<'a> {
    state: &'a ViewState,
    cards: &'a [StackedBook<'a>],
    styles: TimelineStyles,
}

impl<'a> TimelineView<'a> {
    /// Widget over a stacked layout.
    pub fn new(state: &'a ViewState, cards: &'a [StackedBook<'a>]) -> Self {
        Self {
            state,
            cards,
            styles: TimelineStyles::new(),
        }
    }

    /// Replace the colour scheme.
    pub fn styles(mut self, styles: TimelineStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Visible column span `[start, end)` of a pixel range, clipped to `width`.
    fn span(&self, x: f64, pixel_width: f64, width: u16) -> Option<(u16, u16)> {
        let start = self.state.column_of(x);
        let end = self.state.column_of(x + pixel_width).max(start + 1);
        clip(start, end, width)
    }

    fn render_bands(&self, area: Rect, buf: &mut Buffer) {
        let bands = band_geometry(self.state.bounds(), self.state.pixels_per_year());
        for (index, band) in bands.iter().enumerate() {
            let Some((start, end)) = self.span(band.x, band.width, area.width) else {
                continue;
            };
            let columns = Rect::new(area.x + start, area.y, end - start, area.height);
            buf.set_style(columns, self.styles.band(index));
            buf.set_stringn(
                columns.x,
                area.y,
                truncate(band.label, usize::from(columns.width)),
                usize::from(columns.width),
                self.styles.band_label(),
            );
        }
    }

    fn render_axis(&self, area: Rect, buf: &mut Buffer) {
        let y = area.y + BAND_ROW_HEIGHT;
        if y >= area.bottom() {
            return;
        }
        for tick in axis_ticks(self.state.bounds(), self.state.pixels_per_year()) {
            let column = self.state.column_of(tick.x);
            let Ok(column) = u16::try_from(column) else {
                continue;
            };
            if column >= area.width {
                continue;
            }
            buf.set_stringn(
                area.x + column,
                y,
                &tick.label,
                usize::from(area.width - column),
                self.styles.axis(),
            );
        }
    }

    fn render_cards(&self, area: Rect, buf: &mut Buffer) {
        let top = area.y + BAND_ROW_HEIGHT + AXIS_HEIGHT;
        for card in self.cards {
            let Some(visible_row) = card.row.checked_sub(self.state.first_row()) else {
                continue;
            };
            let Some(y) = u16::try_from(visible_row)
                .ok()
                .and_then(|row| row.checked_mul(CARD_HEIGHT))
                .and_then(|offset| top.checked_add(offset))
            else {
                continue;
            };
            if y >= area.bottom() {
                continue;
            }
            let Some((start, end)) = self.span(card.x, card.width, area.width) else {
                continue;
            };

            let width = end - start;
            let height = CARD_HEIGHT.min(area.bottom() - y);
            let x = area.x + start;
            let book = card.book;

            buf.set_style(Rect::new(x, y, width, height), self.styles.card_era(book));
            buf.set_stringn(
                x,
                y,
                truncate(&book.title, usize::from(width)),
                usize::from(width),
                self.styles.card_title(book),
            );
            if height > 1 {
                buf.set_stringn(
                    x,
                    y + 1,
                    truncate(&book.era_text(), usize::from(width)),
                    usize::from(width),
                    self.styles.card_era(book),
                );
            }
        }
    }
}

impl Widget for TimelineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        self.render_bands(area, buf);
        self.render_axis(area, buf);
        self.render_cards(area, buf);
    }
}

/// Clip the column range `[start, end)` to `[0, width)`.
fn clip(start: i64, end: i64, width: u16) -> Option<(u16, u16)> {
    let start = start.max(0);
    let end = end.min(i64::from(width));
    if start >= end {
        return None;
    }
    Some((u16::try_from(start).ok()?, u16::try_from(end).ok()?))
}

/// Card rows that fit below the band and axis lines.
pub fn visible_card_rows(height: u16) -> usize {
    usize::from(height.saturating_sub(BAND_ROW_HEIGHT + AXIS_HEIGHT) / CARD_HEIGHT)
}
