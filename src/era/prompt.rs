//! Classification prompt construction.

use crate::model::Book;
use std::fmt::Write as _;

/// Characters of description kept per book.
pub const DESCRIPTION_LIMIT: usize = 400;

/// Stand-in for a missing description.
pub const MISSING_DESCRIPTION: &str = "No description available";

/// The metadata the classifier sees for one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookDescriptor<'a> {
    /// Book title.
    pub title: &'a str,
    /// Author display string.
    pub author: &'a str,
    /// Free-text blurb.
    pub description: Option<&'a str>,
    /// Subject tags; empty when unknown.
    pub subjects: &'a [String],
}

impl<'a> From<&'a Book> for BookDescriptor<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            title: &book.title,
            author: &book.author,
            description: book.description.as_deref(),
            subjects: &book.subjects,
        }
    }
}

const PREAMBLE: &str = "\
You are a historian and librarian. For each non-fiction book below, determine the historical time period the book's content covers.

Return a JSON object with a \"books\" array containing one entry per book in order.

For each book provide:
- hasHistoricalEra: true if it covers a specific historical period (biography, history, war, science history, etc.)
  false for self-help, personal development, business strategy, productivity, or contemporary how-to books
- startYear: earliest year the content covers (negative integer for BCE, e.g. -44 for 44 BCE, null if hasHistoricalEra is false)
- endYear: latest year covered (null if hasHistoricalEra is false)
- eraLabel: short descriptive label like \"World War II\", \"Ancient Rome\", \"Victorian England\", \"American Civil War\" (null if hasHistoricalEra is false)

Books to classify:

";

const RESPONSE_FORMAT: &str = "

Return ONLY valid JSON matching this structure, with exactly one entry per book in the order given:
{\"books\": [{\"hasHistoricalEra\": true, \"startYear\": 1942, \"endYear\": 1945, \"eraLabel\": \"World War II\"}, ...]}";

/// Build the classification request for one batch.
///
/// Books are numbered from 1 in input order. Batch size is the caller's
/// responsibility.
pub fn build_era_prompt(books: &[BookDescriptor<'_>]) -> String {
    let mut prompt = String::from(PREAMBLE);

    for (index, book) in books.iter().enumerate() {
        if index > 0 {
            prompt.push_str("\n\n");
        }
        let description = book
            .description
            .map(truncate_description)
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());
        let subjects = book.subjects.join(", ");

        // Writing to a String cannot fail
        let _ = write!(
            prompt,
            "{}. \"{}\" by {}\n   Description: {}\n   Subjects: {}",
            index + 1,
            book.title,
            book.author,
            description,
            subjects
        );
    }

    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

/// First [`DESCRIPTION_LIMIT`] characters (not bytes) of a description.
fn truncate_description(description: &str) -> String {
    description.chars().take(DESCRIPTION_LIMIT).collect()
}
