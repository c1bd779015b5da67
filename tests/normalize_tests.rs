use word_sieve::normalize::{collation_key, locale_cmp, upper_letter};
use word_sieve::{CleaningRule, DropCapitalized, FoldTilde, Language, Normalizer, Ruleset};

fn raw(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_drops_wrong_length_sorts_and_uppercases() {
    let normalizer = Normalizer::default();
    let words = normalizer
        .normalize(
            raw(&["trace", "crane", "cat", "crates", "crate"]),
            Language::Default,
            5,
        )
        .words;
    assert_eq!(words, ["CRANE", "CRATE", "TRACE"]);
}

#[test]
fn test_length_counts_letters_not_bytes() {
    let normalizer = Normalizer::default();
    let words = normalizer.normalize(raw(&["école", "arbre", "été"]), Language::French, 5).words;
    assert_eq!(words, ["ARBRE", "ÉCOLE"]);
}

#[test]
fn test_english_drops_capitalized_words() {
    let normalizer = Normalizer::default();
    let words = normalizer
        .normalize(
            raw(&["Paris", "crane", "aDieu", "slate"]),
            Language::English,
            5,
        )
        .words;
    assert_eq!(words, ["CRANE", "SLATE"]);
}

#[test]
fn test_spanish_folds_tilde() {
    let normalizer = Normalizer::default();
    let words = normalizer.normalize(raw(&["niños", "Ñandú", "perro"]), Language::Spanish, 5).words;
    assert_eq!(words, ["NANDÚ", "NINOS", "PERRO"]);
}

#[test]
fn test_french_and_german_are_untouched() {
    let normalizer = Normalizer::default();
    let words = normalizer.normalize(raw(&["Paris", "niños"]), Language::French, 5).words;
    assert_eq!(words, ["NIÑOS", "PARIS"]);

    let words = normalizer.normalize(raw(&["Äpfel", "Blume"]), Language::German, 5).words;
    assert_eq!(words, ["ÄPFEL", "BLUME"]);
}

#[test]
fn test_locale_sort_groups_accents_with_base_letter() {
    let normalizer = Normalizer::default();
    let words = normalizer
        .normalize(raw(&["zèbre", "école", "fleur", "étude"]), Language::French, 5)
        .words;
    assert_eq!(words, ["ÉCOLE", "ÉTUDE", "FLEUR", "ZÈBRE"]);

    assert_eq!(collation_key("École"), "ecole");
    assert_eq!(locale_cmp("ecole", "école"), std::cmp::Ordering::Less);
}

#[test]
fn test_dropped_entries_are_counted_once() {
    let normalizer = Normalizer::default();
    let normalized = normalizer.normalize(raw(&["trace", "cat", "crates"]), Language::Default, 5);
    assert_eq!(normalized.words, ["TRACE"]);
    assert_eq!(normalized.dropped, 2);

    let normalized = normalizer.normalize(raw(&["trace", "crane"]), Language::Default, 5);
    assert_eq!(normalized.dropped, 0);
}

#[test]
fn test_german_sharp_s_keeps_word_length() {
    let normalizer = Normalizer::default();
    let normalized = normalizer.normalize(raw(&["grüße", "blume"]), Language::German, 5);
    assert_eq!(normalized.words, ["BLUME", "GRÜẞE"]);
    assert!(normalized.words.iter().all(|w| w.chars().count() == 5));
    assert_eq!(normalized.dropped, 0);
}

#[test]
fn test_upper_letter_maps_one_char_to_one_char() {
    assert_eq!(upper_letter('a'), 'A');
    assert_eq!(upper_letter('é'), 'É');
    assert_eq!(upper_letter('ß'), 'ẞ');
    assert_eq!(upper_letter('ﬁ'), 'ﬁ');
    assert_eq!(upper_letter('Q'), 'Q');
}

#[test]
fn test_empty_input() {
    let normalizer = Normalizer::default();
    assert!(normalizer.normalize(Vec::new(), Language::English, 5).words.is_empty());
}

struct DropContaining(char);

impl CleaningRule for DropContaining {
    fn name(&self) -> &'static str {
        "drop-containing"
    }

    fn apply(&self, mut words: Vec<String>) -> Vec<String> {
        words.retain(|w| !w.contains(self.0));
        words
    }
}

#[test]
fn test_rules_are_configurable() {
    let mut ruleset = Ruleset::standard();
    ruleset.clear(Language::English);
    ruleset.add_rule(Language::German, DropContaining('ß'));
    let normalizer = Normalizer::new(ruleset);

    let words = normalizer.normalize(raw(&["Paris", "crane"]), Language::English, 5).words;
    assert_eq!(words, ["CRANE", "PARIS"]);

    let words = normalizer.normalize(raw(&["straß", "blume"]), Language::German, 5).words;
    assert_eq!(words, ["BLUME"]);
}

#[test]
fn test_rules_apply_directly() {
    assert_eq!(DropCapitalized.apply(raw(&["Abc", "abc"])), ["abc"]);
    assert_eq!(FoldTilde.apply(raw(&["año", "AÑO"])), ["ano", "ANO"]);
    assert_eq!(Ruleset::standard().rules(Language::French).len(), 0);
    assert_eq!(Ruleset::standard().rules(Language::Spanish).len(), 1);
}
