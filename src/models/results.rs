use serde::Serialize;

use super::feedback::FeedbackTier;
use super::round::RoundRecord;

/// One round as shown on the results screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRound {
    /// 1-based position in the played session (filtered rounds keep their gap)
    pub number: u32,
    /// Display-only similarity percentage
    pub similarity: u8,
    #[serde(flatten)]
    pub record: RoundRecord,
}

/// Derived results view; recomputed on every visit and never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub player_name: String,
    pub displayed_rounds: Vec<DisplayRound>,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub feedback_tier: FeedbackTier,
}

impl ResultsSummary {
    /// Score as a percentage of the maximum, 0 when nothing can be scored
    pub fn percentage(&self) -> f64 {
        if self.max_possible_score == 0 {
            return 0.0;
        }
        f64::from(self.total_score) / f64::from(self.max_possible_score) * 100.0
    }

    /// Feedback message for the achieved tier
    pub fn feedback(&self) -> &'static str {
        self.feedback_tier.message()
    }
}
