//! Era extraction: turning free-text book metadata into historical spans.
//!
//! [`prompt`] serializes a batch of books into one request, [`response`]
//! recovers per-book judgments from whatever text comes back, and [`extract`]
//! runs batches sequentially against an [`EraClassifier`].

pub mod extract;
pub mod prompt;
pub mod response;

pub use extract::{ClassifyError, EraClassifier, EraExtractor, MAX_ERA_BATCH_SIZE};
pub use prompt::{build_era_prompt, BookDescriptor, DESCRIPTION_LIMIT, MISSING_DESCRIPTION};
pub use response::{parse_era_batch, parse_era_response, reconcile};
