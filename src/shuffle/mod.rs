//! k-let preserving shuffles.
//!
//! The orchestration layer only talks to the engine through [`ShuffleEngine`],
//! a two-phase prime/draw protocol: priming does the per-sequence setup once,
//! after which any number of permutations can be drawn cheaply.

pub mod euler;
pub mod orchestrator;

pub use euler::EulerShuffler;
pub use orchestrator::{Emission, Shuffler};

use rand::rngs::StdRng;
use std::fmt;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("draw called before the engine was primed with a sequence")]
    NotPrimed,

    #[error("output buffer holds {actual} bytes but the primed sequence has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("cannot prime with an empty sequence")]
    EmptySequence,

    #[error("k-let size must be at least 1")]
    InvalidKletSize,
}

/// The collaborator contract of a k-let preserving shuffle engine.
#[cfg_attr(test, mockall::automock)]
pub trait ShuffleEngine {
    /// Install the uniform random source used by [`ShuffleEngine::draw`].
    fn set_random_source(&mut self, rng: StdRng);

    /// Precompute the k-let structure of `sequence`. Must precede any draw.
    fn prime(&mut self, sequence: &[u8], k: usize) -> Result<(), EngineError>;

    /// Write one random permutation with the primed k-let counts into `out`,
    /// which must be exactly as long as the primed sequence.
    fn draw(&mut self, out: &mut [u8]) -> Result<(), EngineError>;

    /// Forget the primed sequence so the next `prime` starts clean.
    fn reset(&mut self);
}

/// How many variants to emit per record. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Exactly `n` variants, whether or not any equals the original.
    PermutationCount(NonZeroUsize),
    /// One variant, retrying up to `max_retries` draws to find one that
    /// differs from the original.
    RetryUntilDistinct(NonZeroUsize),
}

impl GenerationMode {
    /// A permutation count of one selects retry mode, anything larger selects
    /// fixed-count mode.
    pub fn from_counts(permutations: NonZeroUsize, max_retries: NonZeroUsize) -> Self {
        if permutations.get() > 1 {
            GenerationMode::PermutationCount(permutations)
        } else {
            GenerationMode::RetryUntilDistinct(max_retries)
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::PermutationCount(n) => write!(f, "{} permutations per record", n),
            GenerationMode::RetryUntilDistinct(r) => {
                write!(f, "one distinct shuffle per record (up to {} retries)", r)
            }
        }
    }
}
