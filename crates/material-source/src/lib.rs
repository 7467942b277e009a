//! Material Source Layer
//!
//! Describes the regional material query and the collaborators that answer
//! it with raw material records.

mod query;
mod source;

pub use query::{MaterialQuery, DEFAULT_PRODUCT_CLASS, DEFAULT_RETURN_FIELDS};
pub use source::{InMemorySource, JsonFileSource, MaterialSource};

use thiserror::Error;

/// Source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },
    #[error("Parse error: {0}")]
    ParseError(String),
}
