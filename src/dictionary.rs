//! Raw dictionary retrieval, keyed by `(language, length)`.
//!
//! Sources only fetch; cleaning is left to the [`Normalizer`](crate::Normalizer)
//! and stale-result handling to the [`Solver`](crate::Solver).

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::Language;
use crate::error::DictionaryError;

/// An asynchronous provider of raw word lists.
pub trait DictionarySource {
    fn fetch(
        &self,
        language: Language,
        length: usize,
    ) -> impl Future<Output = Result<Vec<String>, DictionaryError>> + Send;
}

/// Ticket for one retrieval. Only the most recently issued ticket may
/// replace the solver's dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryRequest {
    pub generation: u64,
    pub language: Language,
    pub length: usize,
}

/// Reads `<root>/<language code>/<length, two digits>.txt`, one word per line.
/// Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, language: Language, length: usize) -> PathBuf {
        self.root
            .join(language.code())
            .join(format!("{length:02}.txt"))
    }
}

impl DictionarySource for DirectorySource {
    fn fetch(
        &self,
        language: Language,
        length: usize,
    ) -> impl Future<Output = Result<Vec<String>, DictionaryError>> + Send {
        let path = self.path_for(language, length);
        async move {
            debug!("loading dictionary {}", path.display());
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(DictionaryError::Missing { language, length })
                }
                Err(source) => return Err(DictionaryError::Io { path, source }),
            };
            let text = String::from_utf8(bytes).map_err(|e| DictionaryError::Malformed {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            Ok(parse_word_list(&text))
        }
    }
}

pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Word lists held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    lists: HashMap<(Language, usize), Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words<I, S>(mut self, language: Language, length: usize, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(language, length, words);
        self
    }

    pub fn insert<I, S>(&mut self, language: Language, length: usize, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .insert((language, length), words.into_iter().map(Into::into).collect());
    }
}

impl DictionarySource for MemorySource {
    fn fetch(
        &self,
        language: Language,
        length: usize,
    ) -> impl Future<Output = Result<Vec<String>, DictionaryError>> + Send {
        let result = self
            .lists
            .get(&(language, length))
            .cloned()
            .ok_or(DictionaryError::Missing { language, length });
        std::future::ready(result)
    }
}
