//! color-score: difference scoring for color-matching games
//!
//! Compares a target color against a player's selection and turns the gap
//! into points.
//!
//! # Quick Start
//!
//! ```
//! use color_score::{difference, score, similarity};
//!
//! let diff = difference("#3366CC", "#3366CD");
//! assert_eq!(diff, 0);
//! assert_eq!(score(diff), 100);
//!
//! let diff = difference("#808080", "#000000");
//! assert_eq!(diff, 50);
//! assert_eq!(score(diff), 40);
//! assert_eq!(similarity(diff), 50);
//! ```
//!
//! # Metric
//!
//! The difference is plain Euclidean distance in device RGB, normalized
//! against the black-to-white distance. It is not a perceptual metric.

mod error;
mod rgb;
mod scoring;

pub use error::ParseColorError;
pub use rgb::Rgb;
pub use scoring::{
    difference, rgb_difference, score, similarity, MAX_DIFFERENCE, MAX_RGB_DISTANCE, MAX_SCORE,
    SCORE_PENALTY,
};
