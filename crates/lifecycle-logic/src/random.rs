//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible score generation.
//! Uses a simple but effective xorshift algorithm.

/// Seeded random number generator for score simulation
///
/// Deterministic: same (seed, tournament, player index) = same sequence,
/// so a retried submission resubmits the identical score.
#[derive(Clone, Debug)]
pub struct ScoreRng {
    state: u64,
}

impl ScoreRng {
    /// Create a new RNG from a pass-level seed, scoped to one player slot
    /// of one tournament.
    pub fn new(seed: u64, tournament_id: u64, player_index: u32) -> Self {
        let mut state = seed;
        state ^= tournament_id.wrapping_mul(0x517cc1b727220a95);
        state ^= (player_index as u64).wrapping_mul(0x9e3779b97f4a7c15);

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}
