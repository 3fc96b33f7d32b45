//! Random streams for path simulation
//!
//! Every simulation call owns its own stream. A seed gives a reproducible
//! `ChaCha8Rng`; no seed falls back to OS entropy. Parallel runs take their
//! per-chunk seeds from [`derive_seeds`] before any work is dispatched.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Generator used by every simulation routine
pub type SimRng = ChaCha8Rng;

/// Seeded stream, or an entropy-seeded one when `seed` is `None`
pub fn make_rng(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// `count` independent sub-seeds drawn from a master stream seeded with `seed`
pub fn derive_seeds(seed: Option<u64>, count: usize) -> Vec<u64> {
    let mut master = make_rng(seed);
    (0..count).map(|_| master.gen::<u64>()).collect()
}

/// One standard normal draw
#[inline]
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}
