use serde::Serialize;
use std::fmt;

/// Feedback bucket for a session's score percentage, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FeedbackTier {
    Exceptional,
    Excellent,
    Good,
    Decent,
    NeedsWork,
    Concerning,
    Poor,
}

impl FeedbackTier {
    pub const ALL: [FeedbackTier; 7] = [
        FeedbackTier::Exceptional,
        FeedbackTier::Excellent,
        FeedbackTier::Good,
        FeedbackTier::Decent,
        FeedbackTier::NeedsWork,
        FeedbackTier::Concerning,
        FeedbackTier::Poor,
    ];

    /// Fixed message template shown with the score
    pub fn message(self) -> &'static str {
        match self {
            FeedbackTier::Exceptional => "IMPRESSIVE! Do you work for Pantone or what?",
            FeedbackTier::Excellent => "EXCELLENT COLOR VISION. You could be a designer.",
            FeedbackTier::Good => "GOOD JOB. Your color perception is above average.",
            FeedbackTier::Decent => "NOT BAD. There's potential in your eye for color.",
            FeedbackTier::NeedsWork => {
                "NEEDS IMPROVEMENT. Perhaps you need to calibrate your monitor?"
            }
            FeedbackTier::Concerning => {
                "CONCERNING. Have you considered taking a colorblindness test?"
            }
            FeedbackTier::Poor => "ARE YOU A DESIGNER OR COLORBLIND? I'm not sure.",
        }
    }
}

impl fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedbackTier::Exceptional => "exceptional",
            FeedbackTier::Excellent => "excellent",
            FeedbackTier::Good => "good",
            FeedbackTier::Decent => "decent",
            FeedbackTier::NeedsWork => "needs work",
            FeedbackTier::Concerning => "concerning",
            FeedbackTier::Poor => "poor",
        };
        write!(f, "{name}")
    }
}
