use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlayerError;

/// A validated, trimmed, non-empty player name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, PlayerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PlayerError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
