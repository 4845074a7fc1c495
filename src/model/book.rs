//! Book records as stored in the library.
//!
//! A [`Book`] carries bibliographic data, the historical era its content
//! covers, and reading metadata. The era is a plain [`EraSpan`] flattened into
//! the persisted JSON so stored libraries keep a flat camelCase shape.

use crate::timeline::format_year;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a book in the library.
///
/// Validated non-empty at construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

/// Error returned when constructing a [`BookId`] from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Book id cannot be empty")]
pub struct InvalidBookId;

impl BookId {
    /// Smart constructor: validates non-empty id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidBookId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidBookId);
        }
        Ok(Self(raw))
    }

    /// Fresh random id (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BookId {
    type Error = InvalidBookId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who decided a book's era.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraSource {
    /// Filled in by the era classifier.
    #[default]
    Auto,
    /// Entered or corrected by the reader.
    Manual,
}

/// Historical span a book's content covers.
///
/// Years are signed: negative values are BCE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraSpan {
    /// Earliest year covered.
    pub start_year: Option<i32>,
    /// Latest year covered.
    pub end_year: Option<i32>,
    /// Short label such as "World War II".
    pub era_label: Option<String>,
    /// Provenance of the span.
    #[serde(default)]
    pub era_source: EraSource,
}

/// Reading progress for a book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    /// Finished.
    #[default]
    Read,
    /// In progress.
    CurrentlyReading,
}

/// Where a book record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSource {
    /// Added by hand (lookup or direct entry).
    #[default]
    Manual,
    /// Goodreads CSV export.
    Goodreads,
    /// StoryGraph CSV export.
    Storygraph,
}

/// A non-fiction book in the reader's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Library identity.
    pub id: BookId,
    /// Title as displayed.
    pub title: String,
    /// Author(s) as a display string.
    pub author: String,
    /// ISBN-10 or ISBN-13, digits only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Short blurb, used as classifier context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subject tags from the bibliographic lookup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    /// Historical span of the content.
    #[serde(flatten)]
    pub era: EraSpan,
    /// False for books that do not cover a historical period.
    pub has_historical_era: bool,
    /// Date the book was finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_read: Option<NaiveDate>,
    /// Star rating, 1-5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Reading progress.
    pub reading_status: ReadingStatus,
    /// Provenance of the record.
    pub source: BookSource,
    /// When the record entered the library.
    pub added_at: DateTime<Utc>,
}

impl Book {
    /// New manual book with a fresh id and no era.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: BookId::generate(),
            title: title.into(),
            author: author.into(),
            isbn: None,
            cover_url: None,
            description: None,
            subjects: Vec::new(),
            era: EraSpan::default(),
            has_historical_era: false,
            date_read: None,
            rating: None,
            reading_status: ReadingStatus::Read,
            source: BookSource::Manual,
            added_at: Utc::now(),
        }
    }

    /// Whether the row stacker can place this book on the timeline.
    pub fn is_placeable(&self) -> bool {
        self.has_historical_era && self.era.start_year.is_some()
    }

    /// Human-readable era, e.g. "44 BCE – 14".
    pub fn era_text(&self) -> String {
        match (self.is_placeable(), self.era.start_year) {
            (true, Some(start)) => match self.era.end_year {
                Some(end) => format!("{} – {}", format_year(start), format_year(end)),
                None => format_year(start),
            },
            _ => "No historical era".to_string(),
        }
    }

    /// Overwrite the era with a reader-supplied one.
    ///
    /// Unparsable years become absent; the book counts as historical exactly
    /// when a start year parsed.
    pub fn set_manual_era(&mut self, start: &str, end: &str, label: &str) {
        let start_year = start.trim().parse::<i32>().ok();
        let end_year = end.trim().parse::<i32>().ok();
        let label = label.trim();

        self.era = EraSpan {
            start_year,
            end_year,
            era_label: (!label.is_empty()).then(|| label.to_string()),
            era_source: EraSource::Manual,
        };
        self.has_historical_era = start_year.is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band_of_brothers() -> Book {
        let mut book = Book::new("Band of Brothers", "Stephen E. Ambrose");
        book.id = BookId::new("test-1").unwrap();
        book.isbn = Some("9780743224543".to_string());
        book.era = EraSpan {
            start_year: Some(1942),
            end_year: Some(1945),
            era_label: Some("World War II".to_string()),
            era_source: EraSource::Auto,
        };
        book.has_historical_era = true;
        book
    }

    #[test]
    fn book_id_rejects_empty() {
        assert_eq!(BookId::new(""), Err(InvalidBookId));
        assert_eq!(BookId::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(BookId::generate(), BookId::generate());
    }

    #[test]
    fn serializes_flat_camel_case() {
        let json = serde_json::to_value(band_of_brothers()).unwrap();
        assert_eq!(json["id"], "test-1");
        assert_eq!(json["startYear"], 1942);
        assert_eq!(json["endYear"], 1945);
        assert_eq!(json["eraLabel"], "World War II");
        assert_eq!(json["eraSource"], "auto");
        assert_eq!(json["hasHistoricalEra"], true);
        assert_eq!(json["readingStatus"], "read");
        assert_eq!(json["source"], "manual");
        assert!(json.get("era").is_none());
        assert!(json.get("subjects").is_none());
    }

    #[test]
    fn deserializes_stored_record() {
        let raw = r#"{
            "id": "test-3",
            "title": "Sapiens",
            "author": "Yuval Noah Harari",
            "startYear": -300000,
            "endYear": 2015,
            "eraLabel": "Human Prehistory to Present",
            "eraSource": "auto",
            "hasHistoricalEra": true,
            "readingStatus": "currently-reading",
            "source": "goodreads",
            "addedAt": "2026-01-03T00:00:00Z"
        }"#;
        let book: Book = serde_json::from_str(raw).unwrap();
        assert_eq!(book.era.start_year, Some(-300000));
        assert_eq!(book.reading_status, ReadingStatus::CurrentlyReading);
        assert_eq!(book.source, BookSource::Goodreads);
        assert!(book.is_placeable());
    }

    #[test]
    fn deserialize_rejects_empty_id() {
        let raw = r#"{"id":"","title":"t","author":"a","startYear":null,"endYear":null,
            "eraLabel":null,"eraSource":"auto","hasHistoricalEra":false,
            "readingStatus":"read","source":"manual","addedAt":"2026-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Book>(raw).is_err());
    }

    #[test]
    fn placeable_requires_flag_and_start_year() {
        let mut book = band_of_brothers();
        assert!(book.is_placeable());

        book.era.start_year = None;
        assert!(!book.is_placeable());

        let mut book = band_of_brothers();
        book.has_historical_era = false;
        assert!(!book.is_placeable());
    }

    #[test]
    fn era_text_formats_bce() {
        let mut book = band_of_brothers();
        book.era.start_year = Some(-44);
        book.era.end_year = Some(14);
        assert_eq!(book.era_text(), "44 BCE – 14");

        book.era.end_year = None;
        assert_eq!(book.era_text(), "44 BCE");

        book.has_historical_era = false;
        assert_eq!(book.era_text(), "No historical era");
    }

    #[test]
    fn manual_era_parses_years_and_marks_source() {
        let mut book = band_of_brothers();
        book.set_manual_era("1939", " 1945 ", "Second World War");
        assert_eq!(book.era.start_year, Some(1939));
        assert_eq!(book.era.end_year, Some(1945));
        assert_eq!(book.era.era_label.as_deref(), Some("Second World War"));
        assert_eq!(book.era.era_source, EraSource::Manual);
        assert!(book.has_historical_era);
    }

    #[test]
    fn manual_era_with_unparsable_start_clears_flag() {
        let mut book = band_of_brothers();
        book.set_manual_era("sometime", "1945", "");
        assert_eq!(book.era.start_year, None);
        assert_eq!(book.era.end_year, Some(1945));
        assert_eq!(book.era.era_label, None);
        assert!(!book.has_historical_era);
    }
}
