pub mod config;
pub mod feedback;
pub mod player;
pub mod results;
pub mod round;

pub use config::{
    AppConfig, FirstRoundPolicy, GameConfig, MaxScorePolicy, ResultsConfig, StoreConfig,
    SECONDS_PER_ROUND, TOTAL_ROUNDS,
};
pub use feedback::FeedbackTier;
pub use player::PlayerName;
pub use results::{DisplayRound, ResultsSummary};
pub use round::{GameSession, RoundRecord};
