//! Question generators
//!
//! Each engine owns its random number generator and nothing else. Engines
//! default to an entropy-seeded [`StdRng`]; tests and the `--seed` flag of
//! the command-line front-end inject a seeded one instead.

pub mod capacity;
pub mod conversion;
pub mod file_size;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use capacity::{CapacityEngine, CapacityQuestion, CapacityScenario, StorageSize};
pub use conversion::{ConversionEngine, ConversionQuestion, Difficulty};
pub use file_size::{FileSizeEngine, FileSizeKind, FileSizeQuestion, FileSizeScenario};

/// Upper bound on rejection-sampling rounds before falling back to an
/// enumerated pick
pub const MAX_SAMPLE_ATTEMPTS: usize = 1_000;

/// Fresh entropy-seeded generator
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Reproducible generator
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniformly pick one element of a non-empty table
pub(crate) fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, table: &[T]) -> T {
    table[rng.gen_range(0..table.len())]
}

/// Uniform integer in `[low, high]` that is a multiple of `step`
///
/// Both bounds must themselves be multiples of `step`.
pub(crate) fn multiple_of<R: Rng + ?Sized>(rng: &mut R, step: u32, low: u32, high: u32) -> u32 {
    rng.gen_range(low / step..=high / step) * step
}
