//! Seedable RNG for destination synthesis and fleet generation.
//!
//! Runs are reproducible: every random draw the server makes comes from a
//! [`SimRng`] derived from [`MotionConfig::seed`][crate::MotionConfig::seed].
//! Sessions split off their own stream with [`SimRng::child`], keyed by
//! session id.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::distributions::{Distribution, Standard};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Weyl-sequence increment; spreads consecutive stream ids across the seed
/// space.
const STREAM_SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation RNG.  Not shared between tasks.
#[derive(Clone, Debug)]
pub struct SimRng {
    rng: SmallRng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }

    /// Split off an independent stream for `stream` (a session id, say).
    /// Consumes one draw from `self`.
    pub fn child(&mut self, stream: u64) -> SimRng {
        let base: u64 = self.rng.r#gen();
        SimRng::new(base ^ stream.wrapping_mul(STREAM_SPREAD))
    }

    /// Borrow the underlying generator for APIs generic over `rand::Rng`,
    /// such as [`random_point_within_radius`][crate::geo::random_point_within_radius].
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        Standard: Distribution<T>,
    {
        self.rng.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.gen_range(range)
    }
}
