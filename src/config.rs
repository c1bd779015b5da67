//! Solver configuration: dictionary language, word length and the
//! duplicate-letters toggle.

use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;

/// Shortest word length a dictionary can be requested for.
pub const WORD_LENGTH_MIN: usize = 3;
/// Word length used when nothing else is configured.
pub const WORD_LENGTH_DEFAULT: usize = 5;
/// Longest word length a dictionary can be requested for.
pub const WORD_LENGTH_MAX: usize = 12;

/// Letters offered by the exclusion store.
pub const LATIN_LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// How an unselected letter is displayed.
pub const UNSELECTED_SYMBOL: char = '\u{2014}';

/// Dictionary language. Each one may carry its own cleaning rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Default,
    English,
    Spanish,
    French,
    German,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Default,
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
    ];

    /// Short code, also the dictionary directory name.
    pub fn code(self) -> &'static str {
        match self {
            Language::Default => "default",
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Default => "Default",
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or(SolverError::UnknownLanguage(code))
    }
}

/// Everything needed to set up a [`Solver`](crate::Solver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub language: Language,
    pub word_length: usize,
    pub allow_duplicate_letters: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            language: Language::French,
            word_length: WORD_LENGTH_DEFAULT,
            allow_duplicate_letters: true,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        check_word_length(self.word_length)
    }
}

pub fn check_word_length(length: usize) -> Result<(), SolverError> {
    if (WORD_LENGTH_MIN..=WORD_LENGTH_MAX).contains(&length) {
        Ok(())
    } else {
        Err(SolverError::WordLength {
            length,
            min: WORD_LENGTH_MIN,
            max: WORD_LENGTH_MAX,
        })
    }
}
