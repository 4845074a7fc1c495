//! Batched era extraction against a classification backend.
//!
//! Books are sent in fixed-size chunks, one request at a time: chunk N+1 is
//! not built until chunk N has been answered. A failing request costs only its
//! own chunk, which comes back as all `None`.

use crate::era::{build_era_prompt, parse_era_batch, BookDescriptor};
use crate::model::{apply_era, Book, EraResult};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Books per classification request.
pub const MAX_ERA_BATCH_SIZE: usize = 15;

/// Failure talking to a classification backend.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// No credentials configured for the backend.
    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    /// The backend answered with an error status.
    #[error("Classification service returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, if any.
        message: String,
    },

    /// The request never completed.
    #[error("Classification request failed: {0}")]
    Transport(String),

    /// The response envelope could not be decoded.
    #[error("Failed to decode classification response: {0}")]
    Decode(String),
}

/// A service that answers one prompt with one text reply.
pub trait EraClassifier {
    /// Send `prompt` and return the raw reply text.
    fn classify(&self, prompt: &str) -> Result<String, ClassifyError>;
}

impl<C: EraClassifier + ?Sized> EraClassifier for &C {
    fn classify(&self, prompt: &str) -> Result<String, ClassifyError> {
        (**self).classify(prompt)
    }
}

impl<C: EraClassifier + ?Sized> EraClassifier for Box<C> {
    fn classify(&self, prompt: &str) -> Result<String, ClassifyError> {
        (**self).classify(prompt)
    }
}

/// Drives prompt building, classification and parsing over many books.
#[derive(Debug, Clone)]
pub struct EraExtractor<C> {
    classifier: C,
    batch_size: usize,
}

impl<C: EraClassifier> EraExtractor<C> {
    /// Extractor with the default batch size.
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            batch_size: MAX_ERA_BATCH_SIZE,
        }
    }

    /// Override the batch size (values below 1 are treated as 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Classify `books`, returning one slot per input book in input order.
    pub fn extract(&self, books: &[BookDescriptor<'_>]) -> Vec<Option<EraResult>> {
        let mut results = Vec::with_capacity(books.len());

        for (index, chunk) in books.chunks(self.batch_size).enumerate() {
            debug!(batch = index, size = chunk.len(), "Classifying batch");
            results.extend(self.extract_batch(chunk));
        }

        results
    }

    fn extract_batch(&self, chunk: &[BookDescriptor<'_>]) -> Vec<Option<EraResult>> {
        let prompt = build_era_prompt(chunk);
        match self.classifier.classify(&prompt) {
            Ok(reply) => parse_era_batch(&reply, chunk.len()),
            Err(e) => {
                warn!(error = %e, size = chunk.len(), "Era classification failed for batch");
                vec![None; chunk.len()]
            }
        }
    }

    /// Classify `books` in place, overwriting each era with the judgment.
    ///
    /// Returns how many books ended up with a historical era.
    pub fn enrich(&self, books: &mut [Book]) -> usize {
        let results = {
            let descriptors: Vec<BookDescriptor<'_>> =
                books.iter().map(BookDescriptor::from).collect();
            self.extract(&descriptors)
        };

        for (book, result) in books.iter_mut().zip(&results) {
            apply_era(book, result.as_ref());
        }

        let historical = books.iter().filter(|book| book.has_historical_era).count();
        info!(total = books.len(), historical, "Era extraction complete");
        historical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EraSource;
    use std::cell::RefCell;

    /// Replies from a script, recording every prompt it was sent.
    struct Scripted {
        replies: RefCell<Vec<Result<String, ClassifyError>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, ClassifyError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into_iter().rev().collect()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl EraClassifier for Scripted {
        fn classify(&self, prompt: &str) -> Result<String, ClassifyError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(ClassifyError::Transport("script exhausted".into())))
        }
    }

    fn reply(entries: &[&str]) -> Result<String, ClassifyError> {
        Ok(format!("{{\"books\": [{}]}}", entries.join(",")))
    }

    const WW2: &str =
        r#"{"hasHistoricalEra": true, "startYear": 1942, "endYear": 1945, "eraLabel": "World War II"}"#;
    const NONE: &str = r#"{"hasHistoricalEra": false, "startYear": null, "endYear": null, "eraLabel": null}"#;

    fn descriptors(titles: &[&'static str]) -> Vec<BookDescriptor<'static>> {
        titles
            .iter()
            .map(|&title| BookDescriptor {
                title,
                author: "Author",
                description: None,
                subjects: &[],
            })
            .collect()
    }

    #[test]
    fn empty_input_makes_no_requests() {
        let classifier = Scripted::new(vec![]);
        let results = EraExtractor::new(&classifier).extract(&[]);
        assert!(results.is_empty());
        assert!(classifier.prompts.borrow().is_empty());
    }

    #[test]
    fn splits_into_sequential_batches() {
        let classifier = Scripted::new(vec![reply(&[WW2, NONE]), reply(&[WW2])]);
        let extractor = EraExtractor::new(&classifier).with_batch_size(2);

        let results = extractor.extract(&descriptors(&["a", "b", "c"]));

        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().has_historical_era);
        assert!(!results[1].as_ref().unwrap().has_historical_era);
        assert!(results[2].as_ref().unwrap().has_historical_era);

        let prompts = classifier.prompts.borrow();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("1. \"a\"") && prompts[0].contains("2. \"b\""));
        assert!(prompts[1].contains("1. \"c\"") && !prompts[1].contains("\"a\""));
    }

    #[test]
    fn failed_batch_yields_none_without_affecting_others() {
        let classifier = Scripted::new(vec![
            Err(ClassifyError::Status {
                status: 529,
                message: "overloaded".into(),
            }),
            reply(&[WW2]),
        ]);
        let extractor = EraExtractor::new(&classifier).with_batch_size(2);

        let results = extractor.extract(&descriptors(&["a", "b", "c"]));

        assert_eq!(results[..2], [None, None]);
        assert!(results[2].is_some());
    }

    #[test]
    fn short_reply_is_padded_to_keep_alignment() {
        let classifier = Scripted::new(vec![reply(&[WW2]), reply(&[NONE])]);
        let extractor = EraExtractor::new(&classifier).with_batch_size(2);

        let results = extractor.extract(&descriptors(&["a", "b", "c"]));

        assert_eq!(results.len(), 3);
        assert!(results[0].is_some());
        assert!(results[1].is_none());
        assert_eq!(results[2], Some(EraResult::not_historical()));
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let extractor = EraExtractor::new(Scripted::new(vec![])).with_batch_size(0);
        assert_eq!(extractor.batch_size(), 1);
    }

    #[test]
    fn enrich_merges_results_into_books() {
        let classifier = Scripted::new(vec![reply(&[WW2, NONE])]);
        let mut books = vec![
            Book::new("Band of Brothers", "Stephen E. Ambrose"),
            Book::new("Atomic Habits", "James Clear"),
        ];
        books[1].era.era_source = EraSource::Manual;

        let historical = EraExtractor::new(&classifier).enrich(&mut books);

        assert_eq!(historical, 1);
        assert_eq!(books[0].era.start_year, Some(1942));
        assert_eq!(books[0].era.era_label.as_deref(), Some("World War II"));
        assert!(!books[1].has_historical_era);
        assert_eq!(books[1].era.era_source, EraSource::Auto);
    }

    #[test]
    fn enrich_survives_unreachable_backend() {
        let classifier = Scripted::new(vec![Err(ClassifyError::MissingApiKey(
            "ANTHROPIC_API_KEY".into(),
        ))]);
        let mut books = vec![Book::new("Sapiens", "Yuval Noah Harari")];

        let historical = EraExtractor::new(&classifier).enrich(&mut books);

        assert_eq!(historical, 0);
        assert!(!books[0].has_historical_era);
    }
}
