pub mod config;
pub mod runner;

pub use config::{RunConfig, ShuffleConfig};
pub use runner::{run, run_with_engine, RunSummary};
