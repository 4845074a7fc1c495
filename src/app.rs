//! Library operations behind the command line.
//!
//! Each operation wires the collaborators together: lookup or import produce
//! books, the era extractor classifies them, and the library stores them.

use crate::era::{build_era_prompt, BookDescriptor, EraClassifier, EraExtractor};
use crate::import::{parse_export_file, ExportFormat};
use crate::library::LibraryStore;
use crate::model::{AppError, Book, BookId, EraSource, LibraryError};
use crate::service::{BookLookup, LookupQuery};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Result of adding a book found by lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Stored as a new book.
    Added(Book),
    /// A book with the same ISBN is already in the library.
    Duplicate(Book),
    /// The lookup found nothing (or failed).
    NotFound,
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows that became books.
    pub parsed: usize,
    /// Books newly stored.
    pub added: usize,
    /// Parsed books that received a historical era.
    pub historical: usize,
}

/// Counts reported after reclassification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    /// Books sent to the classifier.
    pub attempted: usize,
    /// Books that now have a historical era.
    pub historical: usize,
}

/// Look a book up, classify it and store it.
pub fn add_from_lookup<L, C>(
    store: &mut LibraryStore,
    lookup: &L,
    extractor: &EraExtractor<C>,
    query: &str,
) -> Result<AddOutcome, LibraryError>
where
    L: BookLookup + ?Sized,
    C: EraClassifier,
{
    let query = LookupQuery::parse(query);
    let Some(found) = lookup.lookup(&query) else {
        info!(?query, "No lookup match");
        return Ok(AddOutcome::NotFound);
    };

    let mut books = [found.into_book()];
    extractor.enrich(&mut books);
    let [book] = books;

    if store.add(book.clone())? {
        info!(title = %book.title, era = %book.era_text(), "Book added");
        Ok(AddOutcome::Added(book))
    } else {
        Ok(AddOutcome::Duplicate(book))
    }
}

/// Import an export file: parse, classify in batches, store without duplicates.
pub fn import_file<C: EraClassifier>(
    store: &mut LibraryStore,
    extractor: &EraExtractor<C>,
    path: &Path,
    format: ExportFormat,
) -> Result<ImportSummary, AppError> {
    let mut books = parse_export_file(path, format)?;
    if books.is_empty() {
        info!(path = %path.display(), "Export contains no read books");
        return Ok(ImportSummary::default());
    }

    let historical = extractor.enrich(&mut books);
    let parsed = books.len();
    let added = store.add_many(books)?;

    let summary = ImportSummary {
        parsed,
        added,
        historical,
    };
    info!(?summary, "Import complete");
    Ok(summary)
}

/// Whether `classify_pending` would send this book to the classifier.
///
/// Manual eras are never overwritten.
pub fn needs_classification(book: &Book) -> bool {
    !book.has_historical_era && book.era.era_source == EraSource::Auto
}

/// Re-run era extraction for books still without a historical era.
pub fn classify_pending<C: EraClassifier>(
    store: &mut LibraryStore,
    extractor: &EraExtractor<C>,
) -> Result<ClassifySummary, LibraryError> {
    let mut pending: Vec<Book> = store
        .books()
        .iter()
        .filter(|book| needs_classification(book))
        .cloned()
        .collect();
    if pending.is_empty() {
        return Ok(ClassifySummary::default());
    }

    let historical = extractor.enrich(&mut pending);
    let attempted = pending.len();
    let classified: HashMap<BookId, Book> = pending
        .into_iter()
        .map(|book| (book.id.clone(), book))
        .collect();

    store.update_where(
        |book| classified.contains_key(&book.id),
        |book| {
            if let Some(result) = classified.get(&book.id) {
                book.era = result.era.clone();
                book.has_historical_era = result.has_historical_era;
            }
        },
    )?;

    Ok(ClassifySummary {
        attempted,
        historical,
    })
}

/// Set a reader-supplied era.
pub fn set_era<'s>(
    store: &'s mut LibraryStore,
    id: &BookId,
    start: &str,
    end: &str,
    label: &str,
) -> Result<&'s Book, LibraryError> {
    store.update(id, |book| book.set_manual_era(start, end, label))
}

/// Prompt that `classify_pending` would send first.
pub fn pending_prompt(store: &LibraryStore, batch_size: usize) -> String {
    let descriptors: Vec<BookDescriptor<'_>> = store
        .books()
        .iter()
        .filter(|book| needs_classification(book))
        .take(batch_size.max(1))
        .map(BookDescriptor::from)
        .collect();
    build_era_prompt(&descriptors)
}
