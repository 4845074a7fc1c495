//! Per-book outcome of an era classification batch.

use crate::model::{Book, EraSource, EraSpan};

/// Validated classifier judgment for one book.
///
/// Built fresh for each batch and merged into a [`Book`] right away; never
/// stored on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraResult {
    /// Whether the content covers a specific historical period.
    pub has_historical_era: bool,
    /// Earliest year covered (negative = BCE).
    pub start_year: Option<i32>,
    /// Latest year covered (negative = BCE).
    pub end_year: Option<i32>,
    /// Short descriptive label.
    pub era_label: Option<String>,
}

impl EraResult {
    /// Result for a book that covers no historical period.
    pub fn not_historical() -> Self {
        Self {
            has_historical_era: false,
            start_year: None,
            end_year: None,
            era_label: None,
        }
    }

    /// Merge this judgment into a book, marking the era as automatic.
    pub fn apply_to(&self, book: &mut Book) {
        book.era = EraSpan {
            start_year: self.start_year,
            end_year: self.end_year,
            era_label: self.era_label.clone(),
            era_source: EraSource::Auto,
        };
        book.has_historical_era = self.has_historical_era;
    }
}

/// Merge an optional judgment; a missing one leaves the book without an era.
pub fn apply_era(book: &mut Book, result: Option<&EraResult>) {
    match result {
        Some(result) => result.apply_to(book),
        None => EraResult::not_historical().apply_to(book),
    }
}
