use word_sieve::{
    Candidates, DictionaryError, DictionarySource, Language, MemorySource, PositionFilter, Solver,
    SolverConfig, SolverError,
};

fn config(language: Language, allow_duplicate_letters: bool) -> SolverConfig {
    SolverConfig {
        language,
        word_length: 5,
        allow_duplicate_letters,
    }
}

fn get_test_source() -> MemorySource {
    MemorySource::new()
        .with_words(Language::Default, 5, ["trace", "crane", "crate"])
        .with_words(Language::French, 5, ["arbre", "livre", "table"])
        .with_words(Language::French, 6, ["cheval", "maison"])
}

async fn loaded_solver() -> Solver {
    let mut solver = Solver::new(config(Language::Default, true)).unwrap();
    assert!(solver.reload(&get_test_source()).await);
    solver
}

#[test]
fn test_solver_creation() {
    let solver = Solver::new(SolverConfig::default()).unwrap();

    assert_eq!(solver.language(), Language::French);
    assert_eq!(solver.word_length(), 5);
    assert!(solver.allow_duplicate_letters());
    assert_eq!(solver.included().len(), 5);
    assert_eq!(solver.excluded().len(), 26);
    assert_eq!(solver.result().candidates, Candidates::EmptyDictionary);
    assert_eq!(
        solver.render(),
        "French dictionary contains no words of 5 letters"
    );
}

#[test]
fn test_invalid_word_length() {
    let mut cfg = SolverConfig::default();
    cfg.word_length = 2;
    assert!(matches!(
        Solver::new(cfg),
        Err(SolverError::WordLength { length: 2, .. })
    ));

    let mut solver = Solver::new(SolverConfig::default()).unwrap();
    assert!(solver.set_word_length(13).is_err());
    assert_eq!(solver.word_length(), 5);
}

#[tokio::test]
async fn test_reload() {
    let solver = loaded_solver().await;

    assert_eq!(solver.dictionary(), ["CRANE", "CRATE", "TRACE"]);
    assert_eq!(solver.result().count, 3);
    assert_eq!(solver.render(), "CRANE - CRATE - TRACE");
}

#[tokio::test]
async fn test_exclude_letter() {
    let mut solver = loaded_solver().await;
    solver.exclude_letter('n', true).unwrap();

    assert_eq!(solver.result().words(), ["CRATE", "TRACE"]);
    assert!(solver.excluded().is_active('N'));

    solver.exclude_letter('N', false).unwrap();
    assert_eq!(solver.result().count, 3);
}

#[tokio::test]
async fn test_requiring_a_letter_lifts_its_exclusion() {
    let mut solver = loaded_solver().await;
    solver.exclude_letter('R', true).unwrap();
    assert!(solver.result().is_no_match());

    let slot = solver.included().id_at_position(1).unwrap();
    solver.set_required(slot, Some('r')).unwrap();

    assert!(!solver.excluded().is_active('R'));
    assert_eq!(solver.included().flattened_letters(PositionFilter::Fixed), "R");
    assert_eq!(solver.result().count, 3);
}

#[tokio::test]
async fn test_excluding_a_letter_clears_its_requirements() {
    let mut solver = loaded_solver().await;
    let slot = solver.included().id_at_position(0).unwrap();
    solver.set_required(slot, Some('T')).unwrap();
    let somewhere = solver.add_requirement(Some('T'), None);
    assert_eq!(solver.result().words(), ["TRACE"]);

    solver.exclude_letter('T', true).unwrap();

    for id in [slot, somewhere] {
        let record = solver.included().get(id).unwrap();
        assert_eq!(record.letter, None);
        assert!(!record.active);
    }
    assert_eq!(solver.result().words(), ["CRANE"]);
}

#[tokio::test]
async fn test_clearing_a_slot() {
    let mut solver = loaded_solver().await;
    let slot = solver.included().id_at_position(0).unwrap();
    solver.set_required(slot, Some('T')).unwrap();
    assert_eq!(solver.result().count, 1);

    solver.set_required(slot, None).unwrap();
    assert_eq!(solver.result().count, 3);
    assert!(!solver.included().get(slot).unwrap().active);
}

#[tokio::test]
async fn test_requirement_lifecycle() {
    let mut solver = loaded_solver().await;
    let id = solver.add_requirement(None, None);
    assert_eq!(solver.included().len(), 6);
    assert_eq!(solver.result().count, 3);

    solver.set_required(id, Some('N')).unwrap();
    assert_eq!(solver.result().words(), ["CRANE"]);

    solver.set_requirement_position(id, Some(0)).unwrap();
    assert!(solver.result().is_no_match());

    solver.remove_requirement(id).unwrap();
    assert_eq!(solver.result().count, 3);
    assert_eq!(solver.included().len(), 5);

    assert_eq!(
        solver.remove_requirement(id),
        Err(SolverError::UnknownRecord(id))
    );
}

#[tokio::test]
async fn test_duplicate_toggle() {
    let source = MemorySource::new().with_words(Language::Default, 4, ["abba", "abcd"]);
    let mut solver = Solver::new(SolverConfig {
        language: Language::Default,
        word_length: 4,
        allow_duplicate_letters: true,
    })
    .unwrap();
    solver.reload(&source).await;
    assert_eq!(solver.result().count, 2);

    solver.set_allow_duplicate_letters(false);
    assert_eq!(solver.result().words(), ["ABCD"]);
}

#[tokio::test]
async fn test_word_length_change_resets_stores() {
    let mut solver = Solver::new(config(Language::French, true)).unwrap();
    let source = get_test_source();
    solver.reload(&source).await;
    solver.exclude_letter('Z', true).unwrap();
    solver.add_requirement(Some('A'), None);

    let request = solver.set_word_length(6).unwrap();
    assert_eq!(solver.included().len(), 6);
    assert!(solver.included().records().iter().all(|r| !r.active));
    assert_eq!(solver.excluded().flattened_letters(PositionFilter::Any), "");
    assert!(solver.result().is_empty_dictionary());

    let fetched = source.fetch(request.language, request.length).await;
    assert!(solver.apply_dictionary(request, fetched));
    assert_eq!(solver.result().words(), ["CHEVAL", "MAISON"]);
}

#[tokio::test]
async fn test_stale_dictionary_is_discarded() {
    let source = get_test_source();
    let mut solver = Solver::new(config(Language::French, true)).unwrap();

    let first = solver.set_language(Language::Default);
    let second = solver.set_language(Language::French);
    assert!(second.generation > first.generation);

    let fresh = source.fetch(second.language, second.length).await;
    assert!(solver.apply_dictionary(second, fresh));

    // The older request resolves last and must not win.
    let stale = source.fetch(first.language, first.length).await;
    assert!(!solver.apply_dictionary(first, stale));

    assert_eq!(solver.dictionary(), ["ARBRE", "LIVRE", "TABLE"]);
}

#[tokio::test]
async fn test_failed_load_gives_empty_dictionary() {
    let mut solver = Solver::new(config(Language::German, true)).unwrap();
    assert!(solver.reload(&get_test_source()).await);

    assert!(solver.dictionary().is_empty());
    assert_eq!(
        solver.render(),
        "German dictionary contains no words of 5 letters"
    );

    let request = solver.request_dictionary();
    let failure = DictionaryError::Malformed {
        path: "de/05.txt".into(),
        reason: "not a word list".to_string(),
    };
    assert!(solver.apply_dictionary(request, Err(failure)));
    assert!(solver.result().is_empty_dictionary());
}

#[tokio::test]
async fn test_validate_reports_slot_conflicts() {
    let mut solver = loaded_solver().await;
    assert!(solver.validate().is_ok());

    let slot = solver.included().id_at_position(0).unwrap();
    solver.set_required(slot, Some('C')).unwrap();
    solver.add_requirement(Some('T'), Some(0));

    assert_eq!(
        solver.validate(),
        Err(SolverError::ConflictingSlot {
            slot: 0,
            first: 'C',
            second: 'T',
        })
    );
    // Filtering still runs, with the later claim.
    assert_eq!(solver.result().words(), ["TRACE"]);

    let pattern = solver.fixed_pattern();
    assert_eq!(pattern.conflicts().len(), 1);
    assert_eq!(pattern.slots()[0], Some('T'));
    assert_eq!(Solver::check_conflicts(&pattern), solver.validate());
}

#[tokio::test]
async fn test_added_requirement_lifts_exclusion() {
    let mut solver = loaded_solver().await;
    solver.exclude_letter('T', true).unwrap();
    assert_eq!(solver.result().words(), ["CRANE"]);

    let id = solver.add_requirement(Some('t'), None);

    let record = solver.included().get(id).unwrap();
    assert_eq!(record.letter, Some('T'));
    assert!(record.active);
    assert_eq!(solver.excluded().flattened_letters(PositionFilter::Any), "");
    assert_eq!(solver.result().words(), ["CRATE", "TRACE"]);
}

#[tokio::test]
async fn test_german_sharp_s_keeps_slots_aligned() {
    let source = MemorySource::new().with_words(Language::German, 5, ["grüße", "blume"]);
    let mut solver = Solver::new(config(Language::German, true)).unwrap();
    assert!(solver.reload(&source).await);
    assert_eq!(solver.dictionary(), ["BLUME", "GRÜẞE"]);

    let last = solver.included().id_at_position(4).unwrap();
    solver.set_required(last, Some('e')).unwrap();
    assert_eq!(solver.result().words(), ["BLUME", "GRÜẞE"]);

    let fourth = solver.included().id_at_position(3).unwrap();
    solver.set_required(fourth, Some('ß')).unwrap();
    assert_eq!(solver.included().letter(fourth), Some('ẞ'));
    assert_eq!(solver.result().words(), ["GRÜẞE"]);
}

#[tokio::test]
async fn test_reset_keeps_dictionary() {
    let mut solver = loaded_solver().await;
    solver.exclude_letter('E', true).unwrap();
    assert!(solver.result().is_no_match());

    solver.reset();
    assert_eq!(solver.result().count, 3);
    assert_eq!(solver.dictionary().len(), 3);
}

#[tokio::test]
async fn test_refresh_is_stable() {
    let mut solver = loaded_solver().await;
    solver.exclude_letter('N', true).unwrap();
    let before = solver.result().clone();

    assert_eq!(solver.refresh(), &before);
    assert_eq!(solver.refresh(), &before);
}
