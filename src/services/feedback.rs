//! Qualitative feedback for a session's score percentage.

use crate::models::FeedbackTier;

/// Lower percentage bound of each tier, checked in order
const THRESHOLDS: [(f64, FeedbackTier); 6] = [
    (95.0, FeedbackTier::Exceptional),
    (85.0, FeedbackTier::Excellent),
    (75.0, FeedbackTier::Good),
    (60.0, FeedbackTier::Decent),
    (45.0, FeedbackTier::NeedsWork),
    (30.0, FeedbackTier::Concerning),
];

/// Classify `total_score` out of `max_possible_score`.
///
/// A zero maximum has nothing to compare against and is `Poor`.
pub fn classify(total_score: u32, max_possible_score: u32) -> FeedbackTier {
    if max_possible_score == 0 {
        return FeedbackTier::Poor;
    }
    let percentage = f64::from(total_score) / f64::from(max_possible_score) * 100.0;

    THRESHOLDS
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(FeedbackTier::Poor)
}
