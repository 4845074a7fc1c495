//! Bibliographic lookup against Open Library.
//!
//! Lookups either find one candidate or nothing. Transport and decode
//! failures are logged and reported as "nothing".

use crate::config::LookupConfig;
use crate::model::Book;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Candidate match returned by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookLookupResult {
    /// Title.
    pub title: String,
    /// Author display string.
    pub author: String,
    /// ISBN, when known.
    pub isbn: Option<String>,
    /// Cover image URL.
    pub cover_url: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Subject tags.
    pub subjects: Vec<String>,
}

impl BookLookupResult {
    /// Turn the candidate into a fresh manual library record without an era.
    pub fn into_book(self) -> Book {
        let mut book = Book::new(self.title, self.author);
        book.isbn = self.isbn;
        book.cover_url = self.cover_url;
        book.description = self.description;
        book.subjects = self.subjects;
        book
    }
}

/// What the reader typed into the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// A 10- or 13-digit ISBN (separators removed).
    Isbn(String),
    /// Free text, optionally with an author.
    Title {
        /// Title words.
        title: String,
        /// Author name.
        author: Option<String>,
    },
}

impl LookupQuery {
    /// Classify raw input: digits-only (ignoring dashes and spaces) of
    /// length 10 or 13 is an ISBN, anything else a title search.
    pub fn parse(input: &str) -> Self {
        let cleaned: String = input
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .collect();
        let is_isbn = (cleaned.len() == 10 || cleaned.len() == 13)
            && cleaned.chars().all(|c| c.is_ascii_digit());

        if is_isbn {
            LookupQuery::Isbn(cleaned)
        } else {
            LookupQuery::Title {
                title: input.trim().to_string(),
                author: None,
            }
        }
    }
}

/// Failure inside a lookup backend. Never crosses [`BookLookup::lookup`].
#[derive(Debug, Error)]
pub enum LookupError {
    /// Request failed or returned an error status.
    #[error("Lookup request failed: {0}")]
    Transport(String),
    /// Response body was not the expected JSON.
    #[error("Failed to decode lookup response: {0}")]
    Decode(String),
}

/// A bibliographic search service.
pub trait BookLookup {
    /// Backend call; errors are reported.
    fn try_lookup(&self, query: &LookupQuery) -> Result<Option<BookLookupResult>, LookupError>;

    /// Find at most one candidate; any failure resolves to `None`.
    fn lookup(&self, query: &LookupQuery) -> Option<BookLookupResult> {
        match self.try_lookup(query) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, ?query, "Book lookup failed");
                None
            }
        }
    }
}

/// Open Library HTTP client.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    agent: ureq::Agent,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryClient {
    /// Client from config.
    pub fn new(config: &LookupConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, LookupError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "Open Library request");

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        request
            .call()
            .map_err(|e| LookupError::Transport(e.to_string()))?
            .into_json()
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}

impl BookLookup for OpenLibraryClient {
    fn try_lookup(&self, query: &LookupQuery) -> Result<Option<BookLookupResult>, LookupError> {
        match query {
            LookupQuery::Isbn(isbn) => {
                let bibkey = format!("ISBN:{isbn}");
                let data = self.get_json(
                    "/api/books",
                    &[("bibkeys", &bibkey), ("format", "json"), ("jscmd", "details")],
                )?;
                parse_isbn_response(&data, isbn)
            }
            LookupQuery::Title { title, author } => {
                let q = match author {
                    Some(author) if !author.is_empty() => format!("{title} {author}"),
                    _ => title.clone(),
                };
                let data = self.get_json(
                    "/search.json",
                    &[
                        ("q", &q),
                        ("limit", "1"),
                        ("fields", "title,author_name,isbn,cover_i,first_sentence,subject"),
                    ],
                )?;
                parse_search_response(data, &self.covers_url)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct NamedAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Excerpt {
    text: String,
}

#[derive(Debug, Deserialize)]
struct IsbnRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Option<Vec<NamedAuthor>>,
    #[serde(default)]
    cover: Option<HashMap<String, String>>,
    #[serde(default)]
    excerpts: Option<Vec<Excerpt>>,
    #[serde(default)]
    details: Option<IsbnDetails>,
}

#[derive(Debug, Deserialize)]
struct IsbnDetails {
    #[serde(default)]
    title: Option<String>,
}

/// Decode `/api/books?jscmd=details`, keyed by `ISBN:<isbn>`.
fn parse_isbn_response(data: &Value, isbn: &str) -> Result<Option<BookLookupResult>, LookupError> {
    let Some(entry) = data.get(format!("ISBN:{isbn}")) else {
        return Ok(None);
    };
    let record = IsbnRecord::deserialize(entry).map_err(|e| LookupError::Decode(e.to_string()))?;

    let title = record
        .title
        .or_else(|| record.details.and_then(|d| d.title))
        .unwrap_or_default();
    let author = record
        .authors
        .filter(|authors| !authors.is_empty())
        .map(|authors| {
            authors
                .into_iter()
                .map(|a| a.name)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "Unknown".to_string());
    let cover_url = record.cover.and_then(|mut cover| {
        ["medium", "large", "small"]
            .into_iter()
            .find_map(|size| cover.remove(size))
    });
    let description = record
        .excerpts
        .and_then(|excerpts| excerpts.into_iter().next())
        .map(|e| e.text);

    Ok(Some(BookLookupResult {
        title,
        author,
        isbn: Some(isbn.to_string()),
        cover_url,
        description,
        subjects: Vec::new(),
    }))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    #[serde(default)]
    cover_i: Option<i64>,
    #[serde(default)]
    first_sentence: Option<FirstSentence>,
    #[serde(default)]
    subject: Vec<String>,
}

/// `first_sentence` is an object in some documents and a list in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FirstSentence {
    Object { value: String },
    List(Vec<String>),
}

fn parse_search_response(data: Value, covers_url: &str) -> Result<Option<BookLookupResult>, LookupError> {
    let response: SearchResponse =
        serde_json::from_value(data).map_err(|e| LookupError::Decode(e.to_string()))?;

    let Some(doc) = response.docs.into_iter().next() else {
        return Ok(None);
    };

    let description = doc.first_sentence.and_then(|sentence| match sentence {
        FirstSentence::Object { value } => Some(value),
        FirstSentence::List(values) => values.into_iter().next(),
    });

    Ok(Some(BookLookupResult {
        title: doc.title.unwrap_or_default(),
        author: doc
            .author_name
            .into_iter()
            .next()
            .unwrap_or_else(|| "Unknown".to_string()),
        isbn: doc.isbn.into_iter().next(),
        cover_url: doc.cover_i.map(|id| format!("{covers_url}/b/id/{id}-M.jpg")),
        description,
        subjects: doc.subject,
    }))
}
