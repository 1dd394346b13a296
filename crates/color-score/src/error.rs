//! Error types for color parsing

use std::fmt;

/// Error type for hex color parsing.
///
/// Returned when a string is not exactly six hexadecimal digits,
/// optionally preceded by a single `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 6 characters after stripping '#')
    InvalidLength(usize),
    /// Non-hexadecimal character encountered
    InvalidHex(char),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength(len) => {
                write!(f, "invalid hex color length {len} (expected 6 digits)")
            }
            ParseColorError::InvalidHex(c) => {
                write!(f, "invalid hex character: {c:?}")
            }
        }
    }
}

impl std::error::Error for ParseColorError {}
