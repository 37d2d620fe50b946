use crate::bio::{FastaWriter, RecordReader};
use crate::core::config::RunConfig;
use crate::shuffle::{EulerShuffler, ShuffleEngine, Shuffler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub variants: usize,
    /// Records whose retry budget ran out without a distinct shuffle.
    pub fallbacks: usize,
}

/// Shuffle every record of `input` into `output` with the default engine.
pub fn run<R: BufRead, W: Write>(config: &RunConfig, input: R, output: W) -> crate::Result<RunSummary> {
    run_with_engine(config, EulerShuffler::new(), input, output)
}

/// Same as [`run`] with a caller-supplied engine. The engine receives a
/// generator seeded from `config.seed()`.
///
/// Stops at the first fatal error; whatever was written before it stays
/// written.
pub fn run_with_engine<E, R, W>(
    config: &RunConfig,
    engine: E,
    input: R,
    output: W,
) -> crate::Result<RunSummary>
where
    E: ShuffleEngine,
    R: BufRead,
    W: Write,
{
    tracing::debug!("k={}, {}", config.k(), config.mode());

    let mut reader = RecordReader::with_limits(input, config.limits());
    let mut writer = FastaWriter::new(output);
    let mut shuffler = Shuffler::new(engine, StdRng::seed_from_u64(config.seed()));
    let mut summary = RunSummary::default();

    while let Some(record) = reader.read_record()? {
        tracing::debug!(id = %record.name(), length = record.len(), "shuffling record");

        if config.show_original() {
            writer.write_original(&record)?;
        }

        let emission = shuffler.emit(&record, config.mode(), config.k(), &mut writer)?;
        summary.records += 1;
        summary.variants += emission.variants;
        if !emission.distinct {
            summary.fallbacks += 1;
        }
    }

    writer.flush()?;
    Ok(summary)
}
