//! Ordered collections of letter constraints.
//!
//! The same store type backs both the "excluded letters" set (one record per
//! alphabet letter, never positional) and the "required letters" set (one
//! record per word slot, plus any number of unpositioned requirements).
//! Cross-store rules live in [`Solver`](crate::Solver), not here.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{error, warn};

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque key of a [`SelectionRecord`]. Unique across every store in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    fn fresh() -> Self {
        Self(NEXT_RECORD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One constraint slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRecord {
    pub id: RecordId,
    /// `None` while no letter is selected.
    pub letter: Option<char>,
    /// `Some(i)` binds the letter to slot `i`; `None` means "anywhere".
    pub position: Option<usize>,
    pub active: bool,
}

impl SelectionRecord {
    fn new(letter: Option<char>, position: Option<usize>, active: bool) -> Self {
        Self {
            id: RecordId::fresh(),
            letter,
            position,
            active,
        }
    }

    fn matches(&self, filter: PositionFilter) -> bool {
        match filter {
            PositionFilter::Any => true,
            PositionFilter::Fixed => self.position.is_some(),
            PositionFilter::Variable => self.position.is_none(),
        }
    }
}

/// Which records a query looks at, by position kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFilter {
    Any,
    Fixed,
    Variable,
}

/// Ordered, versioned collection of [`SelectionRecord`]s.
///
/// Every operation is total: a mutation naming an unknown id leaves the
/// store untouched, logs the miss and returns `false`.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    records: Vec<SelectionRecord>,
    default_letter: Option<char>,
    version: u64,
}

impl SelectionStore {
    /// `count` inactive, unpositioned records holding `default_letter`.
    pub fn new(count: usize, default_letter: Option<char>) -> Self {
        let mut store = Self {
            records: Vec::new(),
            default_letter,
            version: 0,
        };
        store.reset(count);
        store
    }

    /// One inactive, unselected record per position, in the given order.
    pub fn with_positions(positions: impl IntoIterator<Item = usize>) -> Self {
        let mut store = Self::new(0, None);
        store.reset_with_positions(positions);
        store
    }

    /// One inactive, unpositioned record per letter, in the given order.
    pub fn with_letters(letters: impl IntoIterator<Item = char>) -> Self {
        let mut store = Self::new(0, None);
        store.reset_with_letters(letters);
        store
    }

    /// Store of required letters for words of `length` letters.
    pub fn for_slots(length: usize) -> Self {
        Self::with_positions(0..length)
    }

    /// Store of excluded letters over `alphabet`.
    pub fn for_alphabet(alphabet: &[char]) -> Self {
        Self::with_letters(alphabet.iter().copied())
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn index_of(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    fn record_mut(&mut self, id: RecordId, op: &str) -> Option<&mut SelectionRecord> {
        match self.index_of(id) {
            Some(index) => {
                self.bump();
                Some(&mut self.records[index])
            }
            None => {
                error!("{op}: no selection found with id {id}");
                None
            }
        }
    }

    pub fn reset(&mut self, count: usize) {
        let letter = self.default_letter;
        self.records = (0..count)
            .map(|_| SelectionRecord::new(letter, None, false))
            .collect();
        self.bump();
    }

    pub fn reset_with_positions(&mut self, positions: impl IntoIterator<Item = usize>) {
        let letter = self.default_letter;
        self.records = positions
            .into_iter()
            .map(|p| SelectionRecord::new(letter, Some(p), false))
            .collect();
        self.bump();
    }

    pub fn reset_with_letters(&mut self, letters: impl IntoIterator<Item = char>) {
        self.records = letters
            .into_iter()
            .map(|l| SelectionRecord::new(Some(l), None, false))
            .collect();
        self.bump();
    }

    /// Appends a record and returns its freshly assigned id.
    pub fn add_record(&mut self, letter: Option<char>, position: Option<usize>, active: bool) -> RecordId {
        let record = SelectionRecord::new(letter, position, active);
        let id = record.id;
        self.records.push(record);
        self.bump();
        id
    }

    pub fn remove_record(&mut self, id: RecordId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.records.remove(index);
                self.bump();
                true
            }
            None => {
                warn!("remove_record: no selection found with id {id}, selections unchanged");
                false
            }
        }
    }

    pub fn set_letter(&mut self, id: RecordId, letter: Option<char>) -> bool {
        self.record_mut(id, "set_letter")
            .map(|r| r.letter = letter)
            .is_some()
    }

    pub fn set_active(&mut self, id: RecordId, active: bool) -> bool {
        self.record_mut(id, "set_active")
            .map(|r| r.active = active)
            .is_some()
    }

    pub fn set_position(&mut self, id: RecordId, position: Option<usize>) -> bool {
        self.record_mut(id, "set_position")
            .map(|r| r.position = position)
            .is_some()
    }

    /// Active records matching `filter`, in store order.
    pub fn active(&self, filter: PositionFilter) -> impl Iterator<Item = &SelectionRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| r.active && r.matches(filter))
    }

    /// Concatenated letters of the active records matching `filter`.
    pub fn flattened_letters(&self, filter: PositionFilter) -> String {
        self.active(filter).filter_map(|r| r.letter).collect()
    }

    pub fn has_position(&self, position: usize) -> bool {
        self.records.iter().any(|r| r.position == Some(position))
    }

    pub fn has_letter(&self, letter: char) -> bool {
        self.records.iter().any(|r| r.letter == Some(letter))
    }

    /// Active flag of the first record holding `letter`.
    ///
    /// Letters are assumed unique here, which the store itself does not
    /// enforce; a duplicate is reported but the first record still answers.
    pub fn is_active(&self, letter: char) -> bool {
        let mut twins = self.records.iter().filter(|r| r.letter == Some(letter));
        let Some(first) = twins.next() else {
            warn!("is_active: no selection found with letter {letter}");
            return false;
        };
        if twins.next().is_some() {
            warn!("is_active: more than one selection found with letter {letter}");
        }
        first.active
    }

    pub fn get(&self, id: RecordId) -> Option<&SelectionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn letter(&self, id: RecordId) -> Option<char> {
        self.get(id).and_then(|r| r.letter)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.get(id).and_then(|r| r.position)
    }

    pub fn id_of_letter(&self, letter: char) -> Option<RecordId> {
        self.records
            .iter()
            .find(|r| r.letter == Some(letter))
            .map(|r| r.id)
    }

    pub fn id_at_position(&self, position: usize) -> Option<RecordId> {
        self.records
            .iter()
            .find(|r| r.position == Some(position))
            .map(|r| r.id)
    }

    pub fn letters(&self) -> Vec<Option<char>> {
        self.records.iter().map(|r| r.letter).collect()
    }

    pub fn positions(&self) -> Vec<Option<usize>> {
        self.records.iter().map(|r| r.position).collect()
    }

    pub fn records(&self) -> &[SelectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incremented by every mutation that changed the store.
    pub fn version(&self) -> u64 {
        self.version
    }
}
