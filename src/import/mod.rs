//! CSV import of reading-history exports.
//!
//! Two export schemas are understood, Goodreads and StoryGraph. Only books the
//! reader has finished or is reading are kept; rows without a title are
//! dropped. Imported books start without an era.

use crate::model::{Book, BookSource, ImportError, ReadingStatus};
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Which service produced the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Goodreads "Export Library" CSV.
    Goodreads,
    /// The StoryGraph export CSV.
    Storygraph,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Goodreads => "goodreads",
            ExportFormat::Storygraph => "storygraph",
        })
    }
}

/// Column names of one export schema.
struct Schema {
    source: BookSource,
    title: &'static str,
    author: &'static str,
    isbn: &'static [&'static str],
    rating: &'static str,
    date_read: &'static str,
    status: &'static str,
}

const GOODREADS: Schema = Schema {
    source: BookSource::Goodreads,
    title: "Title",
    author: "Author",
    isbn: &["ISBN13", "ISBN"],
    rating: "My Rating",
    date_read: "Date Read",
    status: "Exclusive Shelf",
};

const STORYGRAPH: Schema = Schema {
    source: BookSource::Storygraph,
    title: "Title",
    author: "Authors",
    isbn: &["ISBN/UID"],
    rating: "Star Rating",
    date_read: "Read Dates",
    status: "Read Status",
};

impl ExportFormat {
    fn schema(self) -> &'static Schema {
        match self {
            ExportFormat::Goodreads => &GOODREADS,
            ExportFormat::Storygraph => &STORYGRAPH,
        }
    }
}

/// Parse a Goodreads export.
pub fn parse_goodreads_csv(text: &str) -> Result<Vec<Book>, ImportError> {
    parse_export(text, ExportFormat::Goodreads)
}

/// Parse a StoryGraph export.
pub fn parse_storygraph_csv(text: &str) -> Result<Vec<Book>, ImportError> {
    parse_export(text, ExportFormat::Storygraph)
}

/// Read and parse an export file.
///
/// # Errors
///
/// Fails if the file cannot be read or its header row cannot be parsed.
pub fn parse_export_file(path: &Path, format: ExportFormat) -> Result<Vec<Book>, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_export(&text, format)
}

/// Parse export text in the given format.
///
/// Malformed rows are logged and skipped.
pub fn parse_export(text: &str, format: ExportFormat) -> Result<Vec<Book>, ImportError> {
    let schema = format.schema();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(ImportError::Header)?.clone();
    let columns = Columns::new(&headers);
    let mut books = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(row = idx + 1, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if let Some(book) = schema.book_from_row(&columns, &row) {
            books.push(book);
        }
    }

    info!(%format, books = books.len(), "Parsed export");
    Ok(books)
}

/// Header name to column index.
struct Columns<'h> {
    index: HashMap<&'h str, usize>,
}

impl<'h> Columns<'h> {
    fn new(headers: &'h StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        Self { index }
    }

    /// Trimmed value of a column, `None` when absent or blank.
    fn get<'r>(&self, row: &'r StringRecord, name: &str) -> Option<&'r str> {
        let i = *self.index.get(name)?;
        row.get(i).map(str::trim).filter(|value| !value.is_empty())
    }
}

impl Schema {
    fn book_from_row(&self, columns: &Columns<'_>, row: &StringRecord) -> Option<Book> {
        let reading_status = match columns.get(row, self.status)? {
            "read" => ReadingStatus::Read,
            "currently-reading" => ReadingStatus::CurrentlyReading,
            other => {
                debug!(status = other, "Skipping shelf");
                return None;
            }
        };

        let title = columns.get(row, self.title)?;

        let mut book = Book::new(title, columns.get(row, self.author).unwrap_or_default());
        book.isbn = self
            .isbn
            .iter()
            .find_map(|name| columns.get(row, name).and_then(clean_isbn));
        book.rating = columns.get(row, self.rating).and_then(parse_rating);
        book.date_read = columns.get(row, self.date_read).and_then(parse_date);
        book.reading_status = reading_status;
        book.source = self.source;
        Some(book)
    }
}

/// Strip the `="..."` spreadsheet wrapping Goodreads puts around ISBNs.
pub fn clean_isbn(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix('=').unwrap_or(cleaned);
    let cleaned = cleaned.strip_prefix('"').unwrap_or(cleaned);
    let cleaned = cleaned.strip_suffix('"').unwrap_or(cleaned);
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// A 1-5 star rating; fractional values round, anything else is no rating.
pub fn parse_rating(raw: &str) -> Option<u8> {
    let value: f64 = raw.trim().parse().ok()?;
    (1.0..=5.0).contains(&value).then(|| value.round() as u8)
}

/// Read date: `2024/01/15` or the end of a `2024-01-01 to 2024-01-15` range.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = match raw.split_once(" to ") {
        Some((_, end)) => end,
        None => raw,
    };
    let date = date.trim().replace('/', "-");
    if date.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(raw, error = %e, "Ignoring unparsable read date");
            None
        }
    }
}
