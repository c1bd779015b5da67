//! The coordinator tying stores, dictionary and filter result together.
//!
//! `Solver` owns everything the filter pipeline reads. Each public mutation
//! is one logical step: it updates the stores (keeping a letter from being
//! both required and excluded) and then refreshes the cached result.

use log::{debug, error, info, warn};

use crate::config::{check_word_length, Language, SolverConfig, LATIN_LETTERS};
use crate::dictionary::{DictionaryRequest, DictionarySource};
use crate::error::{DictionaryError, SolverError};
use crate::filter::{filter_words, FilterOptions, FilterResult, FixedPattern};
use crate::normalize::{upper_letter, Normalizer};
use crate::selection::{PositionFilter, RecordId, SelectionStore};

/// Inputs a [`FilterResult`] was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Inputs {
    dictionary: u64,
    excluded: u64,
    included: u64,
    allow_duplicate_letters: bool,
    word_length: usize,
}

pub struct Solver {
    config: SolverConfig,
    alphabet: Vec<char>,
    normalizer: Normalizer,
    excluded: SelectionStore,
    included: SelectionStore,
    dictionary: Vec<String>,
    /// Bumped whenever the dictionary is replaced.
    dictionary_version: u64,
    /// Generation of the last dictionary request issued.
    generation: u64,
    result: FilterResult,
    computed_from: Option<Inputs>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        Self::with_normalizer(config, Normalizer::default())
    }

    pub fn with_normalizer(config: SolverConfig, normalizer: Normalizer) -> Result<Self, SolverError> {
        config.validate()?;
        let alphabet = LATIN_LETTERS.to_vec();
        let mut solver = Self {
            excluded: SelectionStore::for_alphabet(&alphabet),
            included: SelectionStore::for_slots(config.word_length),
            alphabet,
            normalizer,
            config,
            dictionary: Vec::new(),
            dictionary_version: 0,
            generation: 0,
            result: FilterResult::empty_dictionary(),
            computed_from: None,
        };
        solver.refresh();
        Ok(solver)
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn word_length(&self) -> usize {
        self.config.word_length
    }

    pub fn allow_duplicate_letters(&self) -> bool {
        self.config.allow_duplicate_letters
    }

    pub fn excluded(&self) -> &SelectionStore {
        &self.excluded
    }

    pub fn included(&self) -> &SelectionStore {
        &self.included
    }

    pub fn dictionary(&self) -> &[String] {
        &self.dictionary
    }

    pub fn result(&self) -> &FilterResult {
        &self.result
    }

    /// The result in display form.
    pub fn render(&self) -> String {
        self.result.render(self.config.language, self.config.word_length)
    }

    pub fn normalizer_mut(&mut self) -> &mut Normalizer {
        &mut self.normalizer
    }

    // ------------------------------------------------------------------
    // Dictionary
    // ------------------------------------------------------------------

    /// Issues a ticket for the current `(language, length)`, superseding
    /// every ticket issued before.
    pub fn request_dictionary(&mut self) -> DictionaryRequest {
        self.generation += 1;
        let request = DictionaryRequest {
            generation: self.generation,
            language: self.config.language,
            length: self.config.word_length,
        };
        debug!("request_dictionary: {request:?}");
        request
    }

    /// Installs a fetched word list if `request` is still the latest one.
    ///
    /// Returns `false` when the request was superseded and the words were
    /// discarded. A failed fetch installs an empty dictionary.
    pub fn apply_dictionary(
        &mut self,
        request: DictionaryRequest,
        fetched: Result<Vec<String>, DictionaryError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(
                "apply_dictionary: discarding stale generation {} (current is {})",
                request.generation, self.generation
            );
            return false;
        }

        let raw = fetched.unwrap_or_else(|e| {
            error!("Error loading dictionary: {e}");
            Vec::new()
        });
        self.dictionary = self
            .normalizer
            .normalize(raw, request.language, request.length)
            .words;
        self.dictionary_version += 1;
        info!(
            "{} dictionary of {}-letter words has {} entries",
            request.language.name(),
            request.length,
            self.dictionary.len()
        );
        self.refresh();
        true
    }

    /// Fetches and installs the dictionary for the current settings.
    pub async fn reload<S: DictionarySource>(&mut self, source: &S) -> bool {
        let request = self.request_dictionary();
        let fetched = source.fetch(request.language, request.length).await;
        self.apply_dictionary(request, fetched)
    }

    /// Switches language. The caller must fetch the returned request.
    pub fn set_language(&mut self, language: Language) -> DictionaryRequest {
        info!("set_language: {language}");
        self.config.language = language;
        self.clear_dictionary();
        self.request_dictionary()
    }

    /// Switches word length, which resets both stores. The caller must fetch
    /// the returned request.
    pub fn set_word_length(&mut self, length: usize) -> Result<DictionaryRequest, SolverError> {
        check_word_length(length)?;
        info!("set_word_length: {length}");
        self.config.word_length = length;
        self.reset_stores();
        self.clear_dictionary();
        Ok(self.request_dictionary())
    }

    fn clear_dictionary(&mut self) {
        self.dictionary.clear();
        self.dictionary_version += 1;
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Constraints
    // ------------------------------------------------------------------

    /// Sets the letter of a required-letter record. A letter activates the
    /// record and lifts any exclusion of that letter; `None` deactivates it.
    pub fn set_required(&mut self, id: RecordId, letter: Option<char>) -> Result<(), SolverError> {
        let letter = letter.map(upper_letter);
        if !self.included.set_letter(id, letter) {
            return Err(SolverError::UnknownRecord(id));
        }
        self.included.set_active(id, letter.is_some());

        match (letter, self.included.position(id)) {
            (Some(l), Some(p)) => info!("set_required: {l} is required at exact position {p}"),
            (Some(l), None) => info!("set_required: {l} is required at some position"),
            (None, _) => debug!("set_required: no specific letter is required for {id}"),
        }

        if let Some(letter) = letter {
            self.lift_exclusion(letter);
        }
        self.refresh();
        Ok(())
    }

    fn lift_exclusion(&mut self, letter: char) {
        let ids: Vec<RecordId> = self
            .excluded
            .records()
            .iter()
            .filter(|r| r.letter == Some(letter))
            .map(|r| r.id)
            .collect();
        match ids.as_slice() {
            [] => warn!("letter {letter} was not found in excluded letters"),
            [id] => {
                if self.excluded.get(*id).is_some_and(|r| r.active) {
                    self.excluded.set_active(*id, false);
                }
            }
            _ => warn!("letter {letter} is found many times in excluded letters"),
        }
    }

    /// Toggles an excluded-letter record. Excluding a letter clears every
    /// required-letter record holding it.
    pub fn set_excluded(&mut self, id: RecordId, active: bool) -> Result<(), SolverError> {
        if !self.excluded.set_active(id, active) {
            return Err(SolverError::UnknownRecord(id));
        }

        if active {
            if let Some(letter) = self.excluded.letter(id) {
                let clashing: Vec<RecordId> = self
                    .included
                    .records()
                    .iter()
                    .filter(|r| r.letter == Some(letter))
                    .map(|r| r.id)
                    .collect();
                for required in clashing {
                    self.included.set_letter(required, None);
                    self.included.set_active(required, false);
                }
            }
        }

        info!(
            "set_excluded: exclude {}, require {}",
            none_if_empty(self.excluded.flattened_letters(PositionFilter::Any)),
            none_if_empty(self.included.flattened_letters(PositionFilter::Any))
        );
        self.refresh();
        Ok(())
    }

    /// Excludes or re-allows `letter` by value.
    pub fn exclude_letter(&mut self, letter: char, active: bool) -> Result<(), SolverError> {
        let letter = upper_letter(letter);
        match self.excluded.id_of_letter(letter) {
            Some(id) => self.set_excluded(id, active),
            None => {
                warn!("exclude_letter: {letter} is not part of the alphabet");
                Ok(())
            }
        }
    }

    /// Appends a required-letter record and returns its id. A letter makes
    /// the record active straight away.
    pub fn add_requirement(&mut self, letter: Option<char>, position: Option<usize>) -> RecordId {
        let letter = letter.map(upper_letter);
        let id = self.included.add_record(letter, position, letter.is_some());
        debug!("add_requirement: new record {id} holding {letter:?} at {position:?}");
        if let Some(letter) = letter {
            self.lift_exclusion(letter);
        }
        self.refresh();
        id
    }

    pub fn remove_requirement(&mut self, id: RecordId) -> Result<(), SolverError> {
        if !self.included.remove_record(id) {
            return Err(SolverError::UnknownRecord(id));
        }
        self.refresh();
        Ok(())
    }

    pub fn set_requirement_position(
        &mut self,
        id: RecordId,
        position: Option<usize>,
    ) -> Result<(), SolverError> {
        if !self.included.set_position(id, position) {
            return Err(SolverError::UnknownRecord(id));
        }
        self.refresh();
        Ok(())
    }

    pub fn set_allow_duplicate_letters(&mut self, allow: bool) {
        debug!("set_allow_duplicate_letters: {allow}");
        self.config.allow_duplicate_letters = allow;
        self.refresh();
    }

    /// Clears every constraint, keeping the dictionary.
    pub fn reset(&mut self) {
        self.reset_stores();
        self.refresh();
    }

    fn reset_stores(&mut self) {
        self.included.reset_with_positions(0..self.config.word_length);
        self.excluded.reset_with_letters(self.alphabet.iter().copied());
    }

    /// Reports conflicting fixed-position claims. Filtering still runs when
    /// this fails, keeping the later claim.
    pub fn validate(&self) -> Result<(), SolverError> {
        Self::check_conflicts(&self.fixed_pattern())
    }

    /// The per-slot letters the fixed-position stage filters with.
    pub fn fixed_pattern(&self) -> FixedPattern {
        FixedPattern::from_store(&self.included, self.config.word_length)
    }

    /// Turns the first conflict of `pattern` into an error.
    pub fn check_conflicts(pattern: &FixedPattern) -> Result<(), SolverError> {
        match pattern.conflicts().first() {
            Some(conflict) => Err(SolverError::ConflictingSlot {
                slot: conflict.slot,
                first: conflict.dropped,
                second: conflict.kept,
            }),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Recompute
    // ------------------------------------------------------------------

    fn inputs(&self) -> Inputs {
        Inputs {
            dictionary: self.dictionary_version,
            excluded: self.excluded.version(),
            included: self.included.version(),
            allow_duplicate_letters: self.config.allow_duplicate_letters,
            word_length: self.config.word_length,
        }
    }

    /// Recomputes the filter result if any of its inputs changed.
    pub fn refresh(&mut self) -> &FilterResult {
        let inputs = self.inputs();
        if self.computed_from != Some(inputs) {
            self.result = filter_words(
                &self.dictionary,
                &self.excluded,
                &self.included,
                FilterOptions {
                    word_length: self.config.word_length,
                    allow_duplicate_letters: self.config.allow_duplicate_letters,
                },
            );
            self.computed_from = Some(inputs);
            debug!("refresh: {} candidates", self.result.count);
        }
        &self.result
    }
}

fn none_if_empty(letters: String) -> String {
    if letters.is_empty() {
        "<none>".to_string()
    } else {
        letters
    }
}
