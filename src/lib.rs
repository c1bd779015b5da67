//! # Word Sieve
//!
//! Narrows a word-game dictionary (Wordle, Sutom and the like) to the words
//! consistent with what is known so far: letters that are absent, letters
//! pinned to a slot, and letters present somewhere.
//!
//! The pieces, leaves first:
//!
//! - [`Normalizer`] cleans a raw word list for a language and word length;
//! - [`SelectionStore`] holds one kind of constraint (excluded or required letters);
//! - [`filter_words`] runs the filter stages over a normalized dictionary;
//! - [`Solver`] owns all of the above and keeps the result current.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod selection;
pub mod solver;

pub use config::{Language, SolverConfig, LATIN_LETTERS, WORD_LENGTH_DEFAULT, WORD_LENGTH_MAX, WORD_LENGTH_MIN};
pub use dictionary::{DictionaryRequest, DictionarySource, DirectorySource, MemorySource};
pub use error::{DictionaryError, SolverError};
pub use filter::{filter_words, Candidates, FilterOptions, FilterResult, FixedPattern, LetterBag, SlotConflict};
pub use normalize::{CleaningRule, DropCapitalized, FoldTilde, Normalized, Normalizer, Ruleset};
pub use selection::{PositionFilter, RecordId, SelectionRecord, SelectionStore};
pub use solver::Solver;
