//! The constraint filter pipeline.
//!
//! A normalized dictionary is narrowed by four stages, always in this order:
//!
//! 1. duplicate letters (skipped when duplicates are allowed),
//! 2. excluded letters,
//! 3. letters pinned to a slot,
//! 4. letters required somewhere.
//!
//! Stages 3 and 4 share a per-word [`LetterBag`]: letters matched by a pinned
//! slot are taken out of the bag, and a "somewhere" requirement is checked
//! against what is left.

use log::{debug, warn};
use rayon::prelude::*;

use crate::config::Language;
use crate::selection::{PositionFilter, SelectionStore};

/// Separator used when the candidates are shown as one line.
pub const SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub word_length: usize,
    pub allow_duplicate_letters: bool,
}

/// What the pipeline produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// The dictionary itself was empty.
    EmptyDictionary,
    /// The dictionary had words but none survived.
    NoMatch,
    Words(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    pub count: usize,
    pub candidates: Candidates,
}

impl FilterResult {
    pub fn empty_dictionary() -> Self {
        Self {
            count: 0,
            candidates: Candidates::EmptyDictionary,
        }
    }

    fn from_words(words: Vec<String>) -> Self {
        if words.is_empty() {
            Self {
                count: 0,
                candidates: Candidates::NoMatch,
            }
        } else {
            Self {
                count: words.len(),
                candidates: Candidates::Words(words),
            }
        }
    }

    /// Surviving words, empty for both indicator variants.
    pub fn words(&self) -> &[String] {
        match &self.candidates {
            Candidates::Words(words) => words,
            _ => &[],
        }
    }

    pub fn is_empty_dictionary(&self) -> bool {
        self.candidates == Candidates::EmptyDictionary
    }

    pub fn is_no_match(&self) -> bool {
        self.candidates == Candidates::NoMatch
    }

    /// Human-readable form, as shown next to the word count.
    pub fn render(&self, language: Language, word_length: usize) -> String {
        match &self.candidates {
            Candidates::EmptyDictionary => format!(
                "{} dictionary contains no words of {} letters",
                language.name(),
                word_length
            ),
            Candidates::NoMatch => "No words match the constraints".to_string(),
            Candidates::Words(words) => words.join(SEPARATOR),
        }
    }
}

/// Multiset of the letters of one word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterBag {
    counts: Vec<(char, u32)>,
}

impl LetterBag {
    pub fn of(word: &str) -> Self {
        let mut bag = Self::default();
        for c in word.chars() {
            bag.put(c);
        }
        bag
    }

    fn put(&mut self, letter: char) {
        match self.counts.iter_mut().find(|(c, _)| *c == letter) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((letter, 1)),
        }
    }

    pub fn count(&self, letter: char) -> u32 {
        self.counts
            .iter()
            .find(|(c, _)| *c == letter)
            .map_or(0, |&(_, n)| n)
    }

    /// Removes one occurrence of `letter`, if any is left.
    pub fn take(&mut self, letter: char) -> bool {
        match self.counts.iter_mut().find(|(c, n)| *c == letter && *n > 0) {
            Some((_, n)) => {
                *n -= 1;
                true
            }
            None => false,
        }
    }

    pub fn has_repeats(&self) -> bool {
        self.counts.iter().any(|&(_, n)| n > 1)
    }
}

/// Two active records pinning different letters to the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConflict {
    pub slot: usize,
    /// Letter of the earlier record, discarded.
    pub dropped: char,
    /// Letter of the later record, used for filtering.
    pub kept: char,
}

/// Per-slot letters required by the active fixed-position records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPattern {
    slots: Vec<Option<char>>,
    conflicts: Vec<SlotConflict>,
}

impl FixedPattern {
    /// Builds the pattern for words of `length` letters.
    ///
    /// When two active records claim one slot, the one later in store order
    /// wins and the clash is recorded in [`conflicts`](Self::conflicts).
    pub fn from_store(included: &SelectionStore, length: usize) -> Self {
        let mut slots = vec![None; length];
        let mut conflicts = Vec::new();

        for record in included.active(PositionFilter::Fixed) {
            let (Some(letter), Some(slot)) = (record.letter, record.position) else {
                continue;
            };
            let Some(current) = slots.get_mut(slot) else {
                warn!("fixed letter {letter} targets slot {slot} beyond word length {length}, ignored");
                continue;
            };
            if let Some(previous) = *current {
                if previous != letter {
                    warn!("slot {slot} is claimed by both {previous} and {letter}, keeping {letter}");
                    conflicts.push(SlotConflict {
                        slot,
                        dropped: previous,
                        kept: letter,
                    });
                }
            }
            *current = Some(letter);
        }

        Self { slots, conflicts }
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    pub fn conflicts(&self) -> &[SlotConflict] {
        &self.conflicts
    }

    pub fn is_unconstrained(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Checks `word` slot by slot against the pattern. Shorter words never match.
    pub fn matches(&self, word: &str) -> bool {
        let mut chars = word.chars();
        self.slots.iter().all(|slot| match (chars.next(), slot) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(c), Some(required)) => c == *required,
        })
    }
}

impl std::fmt::Display for FixedPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for slot in &self.slots {
            write!(f, "{}", slot.unwrap_or('.'))?;
        }
        Ok(())
    }
}

/// A word that passed the fixed-position stage, with its unconsumed letters.
struct Survivor<'a> {
    word: &'a str,
    available: LetterBag,
}

fn without_duplicates(words: Vec<&str>) -> Vec<&str> {
    words
        .into_par_iter()
        .filter(|w| !LetterBag::of(w).has_repeats())
        .collect()
}

fn without_excluded<'a>(words: Vec<&'a str>, forbidden: &[char]) -> Vec<&'a str> {
    if forbidden.is_empty() {
        return words;
    }
    words
        .into_par_iter()
        .filter(|w| !w.chars().any(|c| forbidden.contains(&c)))
        .collect()
}

fn matching_fixed<'a>(words: Vec<&'a str>, pattern: &FixedPattern) -> Vec<Survivor<'a>> {
    words
        .into_par_iter()
        .filter(|w| pattern.matches(w))
        .map(|word| {
            let mut available = LetterBag::of(word);
            for letter in pattern.slots().iter().flatten() {
                available.take(*letter);
            }
            Survivor { word, available }
        })
        .collect()
}

fn containing_variable<'a>(
    survivors: Vec<Survivor<'a>>,
    required: &[char],
    allow_duplicate_letters: bool,
) -> Vec<&'a str> {
    survivors
        .into_par_iter()
        .filter(|s| {
            required.iter().all(|&letter| {
                s.available.count(letter) > 0
                    || (allow_duplicate_letters && s.word.contains(letter))
            })
        })
        .map(|s| s.word)
        .collect()
}

/// Runs the full pipeline over a normalized dictionary.
///
/// The result depends only on its inputs and keeps dictionary order.
pub fn filter_words(
    dictionary: &[String],
    excluded: &SelectionStore,
    included: &SelectionStore,
    options: FilterOptions,
) -> FilterResult {
    if dictionary.is_empty() {
        debug!("filter_words: dictionary is empty");
        return FilterResult::empty_dictionary();
    }

    let mut words: Vec<&str> = dictionary.iter().map(String::as_str).collect();

    if !options.allow_duplicate_letters {
        words = without_duplicates(words);
        debug!("filter_words: {} words without duplicated letters", words.len());
    }

    let forbidden: Vec<char> = excluded.flattened_letters(PositionFilter::Any).chars().collect();
    words = without_excluded(words, &forbidden);
    debug!(
        "filter_words: {} words after excluding {}",
        words.len(),
        none_if_empty(&forbidden)
    );

    let pattern = FixedPattern::from_store(included, options.word_length);
    let survivors = matching_fixed(words, &pattern);
    debug!("filter_words: {} words match {}", survivors.len(), pattern);

    let required: Vec<char> = included
        .flattened_letters(PositionFilter::Variable)
        .chars()
        .collect();
    let words = containing_variable(survivors, &required, options.allow_duplicate_letters);
    debug!(
        "filter_words: {} words contain {}",
        words.len(),
        none_if_empty(&required)
    );

    FilterResult::from_words(words.into_iter().map(str::to_owned).collect())
}

fn none_if_empty(letters: &[char]) -> String {
    if letters.is_empty() {
        "<none>".to_string()
    } else {
        letters.iter().collect()
    }
}
