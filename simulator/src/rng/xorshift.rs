//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG that is deterministic and suitable for
//! simulation purposes.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This is CRITICAL for:
//! - Debugging (reproduce an exact run)
//! - Testing (verify behavior)
//! - Checkpointing (resume mid-run from a saved state)

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use venue_contagion_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let row = rng.range(0, 10);       // seat row in [0, 10)
/// let draw = rng.percent();         // infection draw in [0.0, 100.0)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is remapped to 1 (xorshift requires nonzero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// Used to pick seat coordinates during seeding.
    ///
    /// # Panics
    /// Panics if min >= max
    ///
    /// # Example
    /// ```
    /// use venue_contagion_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let col = rng.range(0, 20);
    /// assert!(col < 20);
    /// ```
    pub fn range(&mut self, min: usize, max: usize) -> usize {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as usize
    }

    /// Generate random f64 in range [0.0, 100.0)
    ///
    /// This is the Bernoulli variate compared against a percentage risk.
    ///
    /// # Example
    /// ```
    /// use venue_contagion_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let p = rng.percent();
    /// assert!(p >= 0.0 && p < 100.0);
    /// ```
    pub fn percent(&mut self) -> f64 {
        let value = self.next();
        // 53 high-quality mantissa bits scaled to [0, 100)
        (value >> 11) as f64 * (100.0 / ((1u64 << 53) as f64))
    }

    /// Get current RNG state (for checkpointing/replay)
    ///
    /// Recreating an `RngManager` from this state continues the exact
    /// sequence the original would have produced.
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_percent_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.percent();
            assert!(
                (0.0..100.0).contains(&val),
                "percent() produced value {} outside [0.0, 100.0)",
                val
            );
        }
    }

    #[test]
    fn test_percent_deterministic() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);

        for _ in 0..100 {
            assert_eq!(rng1.percent(), rng2.percent(), "percent() not deterministic");
        }
    }
}
