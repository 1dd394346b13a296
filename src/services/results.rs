//! Turns the persisted round history into the results screen.

use color_score::MAX_SCORE;

use crate::error::ResultsError;
use crate::models::{
    DisplayRound, FirstRoundPolicy, GameConfig, MaxScorePolicy, ResultsConfig, ResultsSummary,
    RoundRecord,
};
use crate::services::feedback;
use crate::services::session_store::{self, SessionStore};

/// Target and selection of the placeholder round some sessions open with
const PLACEHOLDER_TARGET: &str = "#000000";
const PLACEHOLDER_SELECTION: &str = "#FFFFFF";

fn is_warm_up(record: &RoundRecord) -> bool {
    record.target_color.eq_ignore_ascii_case(&record.selected_color)
        || (record.target_color.eq_ignore_ascii_case(PLACEHOLDER_TARGET)
            && record.selected_color.eq_ignore_ascii_case(PLACEHOLDER_SELECTION))
}

/// Whether the first of `records` is excluded from display.
///
/// Only a list that still holds every played round is filtered, which makes
/// filtering its own output a no-op. A lone round is always kept.
pub fn drops_first_round(
    records: &[RoundRecord],
    policy: FirstRoundPolicy,
    total_rounds: u32,
) -> bool {
    let Some(first) = records.first() else {
        return false;
    };
    if records.len() < 2 || records.len() < total_rounds as usize {
        return false;
    }
    match policy {
        FirstRoundPolicy::Keep => false,
        FirstRoundPolicy::AlwaysDrop => true,
        FirstRoundPolicy::Detect => is_warm_up(first),
    }
}

/// Apply the first-round policy
pub fn filter_first_round(
    records: &[RoundRecord],
    policy: FirstRoundPolicy,
    total_rounds: u32,
) -> &[RoundRecord] {
    if drops_first_round(records, policy, total_rounds) {
        &records[1..]
    } else {
        records
    }
}

/// Build the results view for `player_name` from the full persisted history
pub fn summarize(
    player_name: &str,
    records: &[RoundRecord],
    config: &ResultsConfig,
    total_rounds: u32,
) -> ResultsSummary {
    let dropped = drops_first_round(records, config.first_round, total_rounds);
    let offset = usize::from(dropped);

    let displayed_rounds: Vec<DisplayRound> = records
        .iter()
        .enumerate()
        .skip(offset)
        .map(|(i, record)| DisplayRound {
            number: i as u32 + 1,
            similarity: record.similarity(),
            record: record.clone(),
        })
        .collect();

    let total_score: u32 = displayed_rounds
        .iter()
        .map(|r| u32::from(r.record.score))
        .sum();

    let scored_rounds = match config.max_score {
        MaxScorePolicy::FilteredCount => displayed_rounds.len() as u32,
        MaxScorePolicy::Fixed
            if config.first_round == FirstRoundPolicy::AlwaysDrop && total_rounds > 1 =>
        {
            total_rounds.saturating_sub(1)
        }
        MaxScorePolicy::Fixed => total_rounds,
    };
    let max_possible_score = scored_rounds * u32::from(MAX_SCORE);
    let feedback_tier = feedback::classify(total_score, max_possible_score);

    tracing::debug!(
        rounds = records.len(),
        displayed = displayed_rounds.len(),
        total_score,
        max_possible_score,
        tier = %feedback_tier,
        "Summarized results"
    );

    ResultsSummary {
        player_name: player_name.to_string(),
        displayed_rounds,
        total_score,
        max_possible_score,
        feedback_tier,
    }
}

/// Read player and history from the store and summarize them.
///
/// A missing player, a missing history or an unreadable one all mean there is
/// no session to show.
pub fn load_results(
    store: &dyn SessionStore,
    config: &ResultsConfig,
    game: &GameConfig,
) -> Result<ResultsSummary, ResultsError> {
    let player = session_store::read_player_name(store)?
        .filter(|name| !name.trim().is_empty())
        .ok_or(ResultsError::NoSession("no player name"))?;

    let records = match session_store::read_history(store) {
        Ok(Some(records)) => records,
        Ok(None) => return Err(ResultsError::NoSession("no round history")),
        Err(crate::error::StoreError::Json(e)) => {
            tracing::warn!(%e, "Stored round history is malformed");
            return Err(ResultsError::NoSession("malformed round history"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(summarize(&player, &records, config, game.total_rounds))
}
