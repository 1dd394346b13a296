use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Source of target colors
pub trait ColorGenerator: Send {
    /// Next color as `#RRGGBB`
    fn generate(&mut self) -> String;
}

/// Uniform random colors, one hex digit at a time
pub struct RandomColorGenerator {
    rng: StdRng,
}

impl RandomColorGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorGenerator for RandomColorGenerator {
    fn generate(&mut self) -> String {
        let mut color = String::with_capacity(7);
        color.push('#');
        for _ in 0..6 {
            color.push(char::from(HEX_DIGITS[self.rng.gen_range(0..16)]));
        }
        color
    }
}
