//! Test fixtures and constants.

use colorete::models::{GameConfig, RoundRecord};
use colorete::services::ColorGenerator;

/// Targets handed out by [`FixedColors::default`], in order
pub const TARGETS: [&str; 5] = ["#1E90FF", "#FF6347", "#808080", "#2E8B57", "#FFD700"];

/// Player registered by most fixtures
pub const PLAYER: &str = "Ada";

/// Generator cycling through a fixed list
pub struct FixedColors {
    colors: Vec<String>,
    next: usize,
}

impl FixedColors {
    pub fn new(colors: &[&str]) -> Self {
        Self {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            next: 0,
        }
    }
}

impl Default for FixedColors {
    fn default() -> Self {
        Self::new(&TARGETS)
    }
}

impl ColorGenerator for FixedColors {
    fn generate(&mut self) -> String {
        let color = self.colors[self.next % self.colors.len()].clone();
        self.next += 1;
        color
    }
}

/// Short session: 3 rounds of 2s, countdown from 1, 100ms between rounds
pub fn quick_config() -> GameConfig {
    GameConfig {
        total_rounds: 3,
        seconds_per_round: 2,
        countdown_from: 1,
        round_end_delay_ms: 100,
        allow_submit: true,
    }
}

/// A record ended by the timer
pub fn record(target: &str, selected: &str) -> RoundRecord {
    RoundRecord::scored(target, selected, 0)
}

/// Every round matched exactly
pub fn perfect_session() -> Vec<RoundRecord> {
    TARGETS.iter().map(|t| record(t, t)).collect()
}

/// A session whose first round is the black/white placeholder
pub fn session_with_placeholder() -> Vec<RoundRecord> {
    let mut records = vec![record("#000000", "#FFFFFF")];
    records.extend(TARGETS[1..].iter().map(|t| record(t, t)));
    records
}
