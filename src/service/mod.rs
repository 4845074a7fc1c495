//! Network backends: era classification and bibliographic lookup.

pub mod anthropic;
pub mod openlibrary;

pub use anthropic::AnthropicClassifier;
pub use openlibrary::{BookLookup, BookLookupResult, LookupError, LookupQuery, OpenLibraryClient};
