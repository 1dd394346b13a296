use thiserror::Error;

/// Failures of the key-value session store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Failures when starting or driving a game session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No player name stored; the host should go back to the start screen.
    #[error("No player name stored")]
    MissingPlayerName,

    #[error("A session is already running")]
    AlreadyRunning,

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether the host should navigate back to the start screen.
    pub fn redirects_to_start(&self) -> bool {
        matches!(self, EngineError::MissingPlayerName)
    }
}

/// Failures when loading results for display.
#[derive(Debug, Error)]
pub enum ResultsError {
    /// No player name or no usable round history; redirect to the start screen.
    #[error("No completed session: {0}")]
    NoSession(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ResultsError {
    /// Whether the host should navigate back to the start screen.
    pub fn redirects_to_start(&self) -> bool {
        matches!(self, ResultsError::NoSession(_))
    }
}

/// Failures of player registration.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player name must not be empty")]
    EmptyName,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures of the share action. Never affects game state.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Share target unavailable: {0}")]
    Unavailable(String),

    #[error("Share I/O error: {0}")]
    Io(#[from] std::io::Error),
}
