//! Row stacking for timeline cards.
//!
//! Every placeable book becomes a card at the pixel offset of its start year.
//! Cards are assigned greedily, left to right, to the first row whose last
//! card (plus a gap) ends at or before the new card's left edge.

use crate::model::Book;
use crate::timeline::TimelineBounds;

/// Narrowest a card is ever drawn, in pixels.
pub const MIN_CARD_WIDTH: f64 = 96.0;

/// Horizontal gap kept between cards sharing a row, in pixels.
pub const CARD_GAP: f64 = 8.0;

/// Layout of one placed book.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBook<'a> {
    /// The placed book.
    pub book: &'a Book,
    /// Left edge in pixels from the timeline start.
    pub x: f64,
    /// Rendered width in pixels, never below the minimum card width.
    pub width: f64,
    /// Zero-based row index.
    pub row: usize,
}

impl StackedBook<'_> {
    /// Right edge in pixels (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Row stacker parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStacker {
    /// Timeline whose start year anchors pixel offsets.
    pub bounds: TimelineBounds,
    /// Minimum card footprint in pixels.
    pub min_card_width: f64,
    /// Gap between neighbouring cards on a row.
    pub card_gap: f64,
}

impl Default for RowStacker {
    fn default() -> Self {
        Self {
            bounds: TimelineBounds::default(),
            min_card_width: MIN_CARD_WIDTH,
            card_gap: CARD_GAP,
        }
    }
}

impl RowStacker {
    /// Stacker over explicit bounds with the default card metrics.
    pub fn with_bounds(bounds: TimelineBounds) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Lay out `books` at `pixels_per_year`.
    ///
    /// Books that are not placeable (no historical era, or no start year) are
    /// left out. Output is in ascending start-year order; ties keep input
    /// order.
    pub fn stack<'a>(&self, books: &'a [Book], pixels_per_year: f64) -> Vec<StackedBook<'a>> {
        let mut placed: Vec<(&'a Book, i32)> = books
            .iter()
            .filter(|book| book.has_historical_era)
            .filter_map(|book| book.era.start_year.map(|start| (book, start)))
            .collect();

        // sort_by_key is stable
        placed.sort_by_key(|&(_, start)| start);

        // Right edge (plus gap) of the last card on each row
        let mut row_ends: Vec<f64> = Vec::new();
        let mut stacked = Vec::with_capacity(placed.len());

        for (book, start) in placed {
            let x = self.bounds.year_to_pixel(start, pixels_per_year);
            let end_x = match book.era.end_year {
                Some(end) if end != start => self.bounds.year_to_pixel(end, pixels_per_year),
                _ => x + self.min_card_width,
            };
            let width = (end_x - x).max(self.min_card_width);

            let row = row_ends
                .iter()
                .position(|&end| end <= x)
                .unwrap_or(row_ends.len());
            let row_end = x + width + self.card_gap;
            if row == row_ends.len() {
                row_ends.push(row_end);
            } else {
                row_ends[row] = row_end;
            }

            stacked.push(StackedBook {
                book,
                x,
                width,
                row,
            });
        }

        stacked
    }
}

/// Lay out `books` on the default timeline with default card metrics.
pub fn stack_books(books: &[Book], pixels_per_year: f64) -> Vec<StackedBook<'_>> {
    RowStacker::default().stack(books, pixels_per_year)
}

/// Number of rows a layout occupies.
pub fn row_count(stacked: &[StackedBook<'_>]) -> usize {
    stacked.iter().map(|card| card.row + 1).max().unwrap_or(0)
}
