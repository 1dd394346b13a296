//! Assertion helpers for tests.

use colorete::models::RoundRecord;
use colorete::services::session_store::{self, SessionStore, GAME_RESULTS_KEY};
use pretty_assertions::assert_eq;

/// Assert the store holds exactly `expected` rounds
pub fn assert_persisted_rounds(store: &dyn SessionStore, expected: usize) -> Vec<RoundRecord> {
    let history = session_store::read_history(store)
        .expect("stored history should be valid JSON")
        .unwrap_or_default();
    assert_eq!(
        history.len(),
        expected,
        "Expected {} persisted rounds, got {:?}",
        expected,
        history
    );
    history
}

/// Assert nothing has been stored under `gameResults`
pub fn assert_no_results(store: &dyn SessionStore) {
    let raw = store.get(GAME_RESULTS_KEY).unwrap();
    assert!(raw.is_none(), "Expected no stored results, got {raw:?}");
}

/// Assert a record holds internally consistent scoring
pub fn assert_scored(record: &RoundRecord) {
    assert_eq!(
        record.difference,
        color_score::difference(&record.target_color, &record.selected_color),
        "difference mismatch in {record:?}"
    );
    assert_eq!(
        record.score,
        color_score::score(record.difference),
        "score mismatch in {record:?}"
    );
}
