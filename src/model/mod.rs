//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod book;
pub mod era;
pub mod error;
pub mod key_action;
pub mod zoom;

// Re-export for convenience
pub use book::{Book, BookId, BookSource, EraSource, EraSpan, InvalidBookId, ReadingStatus};
pub use era::{apply_era, EraResult};
pub use error::{AppError, ImportError, LibraryError};
pub use key_action::KeyAction;
pub use zoom::{InvalidZoomLevel, ZoomLevel};
