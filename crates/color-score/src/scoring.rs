//! Difference, score and similarity functions
//!
//! All three are pure and total. Unparsable colors never produce an error:
//! they are scored as the maximum difference.

use crate::rgb::Rgb;

/// Largest possible difference value.
pub const MAX_DIFFERENCE: u8 = 100;

/// Score awarded for an exact match.
pub const MAX_SCORE: u8 = 100;

/// Normalization constant, `√(255² · 3)` rounded to two decimals.
pub const MAX_RGB_DISTANCE: f64 = 441.67;

/// Per-point penalty applied to the difference when scoring.
pub const SCORE_PENALTY: f64 = 1.2;

/// Normalized (0..=100) Euclidean RGB distance between two hex colors.
///
/// Returns [`MAX_DIFFERENCE`] if either string fails to parse.
///
/// # Example
/// ```
/// use color_score::difference;
/// assert_eq!(difference("#000000", "#FFFFFF"), 100);
/// assert_eq!(difference("#123456", "#123456"), 0);
/// assert_eq!(difference("#123456", "not a color"), 100);
/// ```
pub fn difference(a: &str, b: &str) -> u8 {
    match (a.parse::<Rgb>(), b.parse::<Rgb>()) {
        (Ok(a), Ok(b)) => rgb_difference(a, b),
        _ => MAX_DIFFERENCE,
    }
}

/// Normalized difference between two parsed colors.
pub fn rgb_difference(a: Rgb, b: Rgb) -> u8 {
    let normalized = (a.distance(b) / MAX_RGB_DISTANCE * 100.0).round();
    normalized.min(f64::from(MAX_DIFFERENCE)) as u8
}

/// Points for a round with the given difference.
///
/// An exact match scores [`MAX_SCORE`]; otherwise the score falls by
/// [`SCORE_PENALTY`] per point of difference and bottoms out at 0 from a
/// difference of 84 upwards.
///
/// # Example
/// ```
/// use color_score::score;
/// assert_eq!(score(0), 100);
/// assert_eq!(score(10), 88);
/// assert_eq!(score(90), 0);
/// ```
pub fn score(difference: u8) -> u8 {
    if difference == 0 {
        return MAX_SCORE;
    }
    let raw = (f64::from(MAX_SCORE) - f64::from(difference) * SCORE_PENALTY).round();
    raw.clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Display-only similarity percentage, `100 - difference` clamped at 0.
pub fn similarity(difference: u8) -> u8 {
    MAX_SCORE.saturating_sub(difference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_colors_have_zero_difference() {
        for color in ["#000000", "#FFFFFF", "#7F3A10", "abcdef"] {
            assert_eq!(difference(color, color), 0, "color {color}");
        }
    }

    #[test]
    fn test_black_white_is_maximum() {
        assert_eq!(difference("#000000", "#FFFFFF"), 100);
        assert_eq!(difference("#ffffff", "000000"), 100);
    }

    #[test]
    fn test_difference_is_symmetric() {
        let pairs = [
            ("#FF0000", "#00FF00"),
            ("#123456", "#654321"),
            ("#808080", "#FFFFFF"),
            ("#000000", "bogus"),
        ];
        for (a, b) in pairs {
            assert_eq!(difference(a, b), difference(b, a), "{a} vs {b}");
        }
    }

    #[test]
    fn test_unparsable_is_maximum_difference() {
        assert_eq!(difference("#FFFFFF", ""), 100);
        assert_eq!(difference("red", "#FF0000"), 100);
        assert_eq!(difference("#FFF", "#FFFFFF"), 100);
    }

    #[test]
    fn test_single_channel_difference() {
        // 255 / 441.67 * 100 = 57.73 -> 58
        assert_eq!(difference("#000000", "#FF0000"), 58);
        // 1 / 441.67 * 100 = 0.23 -> 0
        assert_eq!(difference("#000000", "#000001"), 0);
    }

    #[test]
    fn test_score_exact_match() {
        assert_eq!(score(0), 100);
    }

    #[test]
    fn test_score_penalty_curve() {
        assert_eq!(score(1), 99);
        assert_eq!(score(5), 94);
        assert_eq!(score(50), 40);
        assert_eq!(score(82), 2);
    }

    #[test]
    fn test_score_saturates_before_max_difference() {
        assert_eq!(score(83), 0);
        assert_eq!(score(84), 0);
        for d in 84..=100 {
            assert_eq!(score(d), 0, "difference {d}");
        }
    }

    #[test]
    fn test_score_is_non_increasing() {
        let mut previous = score(0);
        for d in 1..=100 {
            let current = score(d);
            assert!(current <= previous, "score({d}) = {current} > {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_score_clamps_out_of_range_input() {
        assert_eq!(score(u8::MAX), 0);
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity(0), 100);
        assert_eq!(similarity(37), 63);
        assert_eq!(similarity(100), 0);
        assert_eq!(similarity(200), 0);
    }
}
