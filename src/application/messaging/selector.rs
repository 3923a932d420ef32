//! Response selection - uniform random pick from a message pool

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

/// Picks responses from configured pools. Owns its random source so tests can
/// inject a seeded one.
pub struct ResponseSelector {
    rng: StdRng,
}

impl ResponseSelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic selector, used by tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A uniformly random element of `pool`, or `fallback` verbatim when the
    /// pool is empty.
    pub fn select<'a>(&mut self, pool: &'a [String], fallback: &'a str) -> &'a str {
        pool.choose(&mut self.rng)
            .map(String::as_str)
            .unwrap_or(fallback)
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}
