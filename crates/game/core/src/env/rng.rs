//! RNG oracle for deterministic random number generation.
//!
//! Every random decision in a battle (question draws, critical hits, special
//! heals, boss sampling) is derived from a seed computed out of the session
//! seed, the session nonce and a stream discriminator. Given the same seed an
//! oracle must always produce the same value, which keeps sessions replayable
//! and lets tests substitute fixed oracles.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d1000 (1-1000 inclusive).
    ///
    /// Used for per-mille chances such as critical hits.
    fn roll_permille(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 1000) + 1
    }

    /// Pick an index in `0..len`.
    ///
    /// Returns 0 when `len` is 0; callers check for empty collections first.
    fn pick_index(&self, seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u32(seed) as usize) % len
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state. It is stateless: each call advances the supplied seed by one
/// LCG step and permutes the result.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Stream discriminators that keep independent rolls of one transition apart.
pub mod streams {
    pub const QUESTION_DRAW: u32 = 1;
    pub const PLAYER_CRIT: u32 = 2;
    pub const SPECIAL_HEAL: u32 = 3;
    pub const BOSS_CRIT: u32 = 4;
    pub const ROSTER: u32 = 5;
}

/// Compute deterministic seed from session components.
///
/// # Arguments
///
/// * `session_seed` - Base seed chosen when the floor starts
/// * `nonce` - Transition sequence number (increments each transition)
/// * `stream` - Which kind of roll this is (see [`streams`])
/// * `context` - Additional context for multiple rolls of the same kind
pub fn compute_seed(session_seed: u64, nonce: u64, stream: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style combiners
    let mut hash = session_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
