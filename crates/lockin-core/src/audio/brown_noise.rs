use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Brown noise generator (also known as Brownian or red noise).
/// Power falls 6 dB per octave, a deep rumble that masks speech without hiss.
pub struct BrownNoise {
    last_value: f32,
    rng: StdRng,
}

impl BrownNoise {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic stream, for tests and reproducible renders.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            last_value: 0.0,
            rng,
        }
    }
}

impl Default for BrownNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for BrownNoise {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let white: f32 = self.rng.gen_range(-1.0..1.0);
        // Leaky integration keeps the walk centred on zero.
        self.last_value = (self.last_value + 0.02 * white) / 1.02;
        // Make up for the level lost to integration.
        Some(self.last_value * 3.5)
    }
}
