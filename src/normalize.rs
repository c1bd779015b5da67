//! Dictionary cleaning: length check, per-language rules, locale sort and
//! upper-casing, in that order.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::{debug, warn};

use crate::config::Language;

/// A language-specific pass over a raw word list.
pub trait CleaningRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, words: Vec<String>) -> Vec<String>;
}

/// Drops every word holding an upper-case Latin letter, which in the English
/// lists marks proper nouns and abbreviations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropCapitalized;

impl CleaningRule for DropCapitalized {
    fn name(&self) -> &'static str {
        "drop-capitalized"
    }

    fn apply(&self, mut words: Vec<String>) -> Vec<String> {
        words.retain(|w| !w.chars().any(|c| c.is_ascii_uppercase()));
        words
    }
}

/// Folds `ñ`/`Ñ` to `n`/`N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldTilde;

impl CleaningRule for FoldTilde {
    fn name(&self) -> &'static str {
        "fold-tilde"
    }

    fn apply(&self, words: Vec<String>) -> Vec<String> {
        words
            .into_iter()
            .map(|w| {
                if w.contains(&['ñ', 'Ñ'][..]) {
                    w.replace('ñ', "n").replace('Ñ', "N")
                } else {
                    w
                }
            })
            .collect()
    }
}

/// Cleaning rules registered per language. Languages without an entry are
/// left untouched.
#[derive(Default)]
pub struct Ruleset {
    rules: HashMap<Language, Vec<Box<dyn CleaningRule>>>,
}

impl Ruleset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// English drops capitalized entries, Spanish folds the tilde.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(Language::English, DropCapitalized)
            .with_rule(Language::Spanish, FoldTilde)
    }

    pub fn with_rule(mut self, language: Language, rule: impl CleaningRule + 'static) -> Self {
        self.add_rule(language, rule);
        self
    }

    pub fn add_rule(&mut self, language: Language, rule: impl CleaningRule + 'static) {
        self.rules.entry(language).or_default().push(Box::new(rule));
    }

    pub fn clear(&mut self, language: Language) {
        self.rules.remove(&language);
    }

    pub fn rules(&self, language: Language) -> &[Box<dyn CleaningRule>] {
        self.rules.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn apply(&self, language: Language, words: Vec<String>) -> Vec<String> {
        self.rules(language).iter().fold(words, |words, rule| {
            let before = words.len();
            let words = rule.apply(words);
            debug!(
                "{} rule {} kept {} of {} words",
                language.code(),
                rule.name(),
                words.len(),
                before
            );
            words
        })
    }
}

pub struct Normalizer {
    ruleset: Ruleset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Ruleset::standard())
    }
}

impl Normalizer {
    pub fn new(ruleset: Ruleset) -> Self {
        Self { ruleset }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn ruleset_mut(&mut self) -> &mut Ruleset {
        &mut self.ruleset
    }

    /// Turns a raw word list into a filter-ready dictionary of upper-case
    /// words of exactly `length` letters.
    pub fn normalize(&self, raw: Vec<String>, language: Language, length: usize) -> Normalized {
        let total = raw.len();
        let mut words: Vec<String> = raw
            .into_iter()
            .filter(|w| w.chars().count() == length)
            .collect();

        let dropped = total - words.len();
        if dropped > 0 {
            let (suffix, verb) = if dropped > 1 { ("s", "are") } else { ("", "is") };
            warn!(
                "{} dictionary has {dropped} word{suffix} that {verb} not of length {length}",
                language.name()
            );
        }

        words = self.ruleset.apply(language, words);
        words.sort_by(|a, b| locale_cmp(a, b));
        words.iter_mut().for_each(|w| *w = w.chars().map(upper_letter).collect());
        Normalized { words, dropped }
    }
}

/// Output of [`Normalizer::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub words: Vec<String>,
    /// Raw entries discarded for having the wrong length.
    pub dropped: usize,
}

/// Upper-cases one letter without changing the letter count: `ß` maps to
/// `ẞ`, and a letter with no single-char upper case is kept as is.
pub fn upper_letter(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ if c == 'ß' => 'ẞ',
        _ => c,
    }
}

/// Primary collation key: diacritics folded to their base Latin letter,
/// case ignored.
pub fn collation_key(word: &str) -> String {
    word.chars()
        .flat_map(|c| fold_diacritic(c).to_lowercase())
        .collect()
}

/// Compares by collation key first, then by the raw text so the order stays total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' | 'Ÿ' => 'Y',
        other => other,
    }
}
