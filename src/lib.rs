pub mod bio;
pub mod cli;
pub mod core;
pub mod shuffle;

pub use crate::bio::{FastaRecord, FastaWriter, FormatError, RecordReader};
pub use crate::core::{config::RunConfig, runner::RunSummary};
pub use crate::shuffle::{EulerShuffler, GenerationMode, ShuffleEngine, Shuffler};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KshuffleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input error: {0}")]
    Format(#[from] FormatError),

    #[error("Shuffle engine error: {0}")]
    Engine(#[from] shuffle::EngineError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KshuffleError>;
