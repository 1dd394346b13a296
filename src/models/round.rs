use color_score::Rgb;
use serde::{Deserialize, Serialize};

/// Outcome of one finished round, as persisted under `gameResults`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub target_color: String,
    pub selected_color: String,
    /// Normalized RGB distance, 0..=100
    pub difference: u8,
    /// Points awarded, 0..=100
    pub score: u8,
    /// Seconds left on the round timer when the round ended
    pub time_remaining: u32,
}

impl RoundRecord {
    /// Score a finished round.
    ///
    /// Parsable colors are stored as canonical `#RRGGBB`. Unparsable ones are
    /// kept verbatim and scored as the maximum difference.
    pub fn scored(
        target_color: impl Into<String>,
        selected_color: impl Into<String>,
        time_remaining: u32,
    ) -> Self {
        let target_color = canonical(target_color.into());
        let selected_color = canonical(selected_color.into());
        let difference = color_score::difference(&target_color, &selected_color);

        Self {
            score: color_score::score(difference),
            target_color,
            selected_color,
            difference,
            time_remaining,
        }
    }

    /// Display-only similarity percentage
    pub fn similarity(&self) -> u8 {
        color_score::similarity(self.difference)
    }
}

fn canonical(color: String) -> String {
    color.parse::<Rgb>().map(Rgb::to_hex).unwrap_or(color)
}

/// In-flight session state owned by the game engine.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub total_rounds: u32,
    pub seconds_per_round: u32,
    /// 1-based index of the round being played
    pub current_round: u32,
    /// Targets for every round, fixed before the first round starts
    pub targets: Vec<String>,
    pub history: Vec<RoundRecord>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl GameSession {
    pub fn new(targets: Vec<String>, seconds_per_round: u32) -> Self {
        let rounds = targets.len();
        Self {
            total_rounds: rounds as u32,
            seconds_per_round,
            current_round: 0,
            targets,
            history: Vec::with_capacity(rounds),
            started_at: chrono::Utc::now(),
        }
    }

    /// Target for a 1-based round number
    pub fn target_for(&self, round: u32) -> Option<&str> {
        round
            .checked_sub(1)
            .and_then(|i| self.targets.get(i as usize))
            .map(String::as_str)
    }

    pub fn is_last_round(&self) -> bool {
        self.current_round >= self.total_rounds
    }
}
