//! Error types for the constraint model and dictionary retrieval.
//!
//! Nothing in this crate treats these as fatal: store lookups degrade to a
//! no-op, failed retrievals degrade to an empty dictionary.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::Language;
use crate::selection::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("no selection found with id {0}")]
    UnknownRecord(RecordId),

    /// Two active fixed-position requirements pin different letters to one slot.
    #[error("slot {slot} is claimed by both '{first}' and '{second}'")]
    ConflictingSlot { slot: usize, first: char, second: char },

    #[error("word length {length} is outside {min}..={max}")]
    WordLength { length: usize, min: usize, max: usize },

    #[error("unknown language code '{0}'")]
    UnknownLanguage(String),
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("no {language} dictionary for words of {length} letters")]
    Missing { language: Language, length: usize },

    #[error("could not read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}
