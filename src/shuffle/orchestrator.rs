use crate::bio::{FastaRecord, FastaWriter};
use crate::shuffle::{GenerationMode, ShuffleEngine};
use rand::rngs::StdRng;
use std::io::Write;

/// What was written for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    /// Units written for the record.
    pub variants: usize,
    /// Draws taken from the engine.
    pub attempts: usize,
    /// False when retry mode ran out of attempts and wrote a shuffle equal
    /// to the original.
    pub distinct: bool,
}

/// Drives a [`ShuffleEngine`] for each record and writes the variants.
pub struct Shuffler<E: ShuffleEngine> {
    engine: E,
}

impl<E: ShuffleEngine> Shuffler<E> {
    /// Takes ownership of the engine and installs the run's generator in it.
    pub fn new(mut engine: E, rng: StdRng) -> Self {
        engine.set_random_source(rng);
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Prime the engine with `record`, write its variants per `mode`, and
    /// reset the engine whatever the outcome.
    pub fn emit<W: Write>(
        &mut self,
        record: &FastaRecord,
        mode: GenerationMode,
        k: usize,
        out: &mut FastaWriter<W>,
    ) -> crate::Result<Emission> {
        self.engine.prime(record.sequence(), k)?;
        let result = match mode {
            GenerationMode::PermutationCount(n) => self.emit_permutations(record, n.get(), out),
            GenerationMode::RetryUntilDistinct(max) => self.emit_distinct(record, max.get(), out),
        };
        self.engine.reset();
        result
    }

    fn emit_permutations<W: Write>(
        &mut self,
        record: &FastaRecord,
        count: usize,
        out: &mut FastaWriter<W>,
    ) -> crate::Result<Emission> {
        for i in 1..=count {
            let mut shuffled = vec![0u8; record.len()];
            self.engine.draw(&mut shuffled)?;
            out.write_permutation(record, i, &shuffled)?;
        }
        Ok(Emission {
            variants: count,
            attempts: count,
            distinct: true,
        })
    }

    fn emit_distinct<W: Write>(
        &mut self,
        record: &FastaRecord,
        max_retries: usize,
        out: &mut FastaWriter<W>,
    ) -> crate::Result<Emission> {
        let original = record.sequence();
        let mut shuffled = vec![0u8; record.len()];

        for attempt in 1..=max_retries {
            self.engine.draw(&mut shuffled)?;
            if shuffled[..] != original[..] {
                out.write_shuffled(record, &shuffled)?;
                tracing::trace!(id = %record.name(), attempt, "found distinct shuffle");
                return Ok(Emission {
                    variants: 1,
                    attempts: attempt,
                    distinct: true,
                });
            }
        }

        tracing::warn!(
            "failed to find new shuffle for sequence \"{}\" ({}) after {} retries",
            record.header(),
            String::from_utf8_lossy(original),
            max_retries
        );
        out.write_shuffled(record, &shuffled)?;
        Ok(Emission {
            variants: 1,
            attempts: max_retries,
            distinct: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::{EngineError, MockShuffleEngine};
    use crate::KshuffleError;
    use rand::SeedableRng;
    use std::num::NonZeroUsize;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn record() -> FastaRecord {
        FastaRecord::new(">seq1", "AACCGG").unwrap()
    }

    /// A mock engine that answers draws from `script` in order.
    fn scripted(script: &[&'static [u8; 6]], k: usize) -> MockShuffleEngine {
        let mut engine = MockShuffleEngine::new();
        engine.expect_set_random_source().times(1).return_const(());
        engine
            .expect_prime()
            .withf(move |s, kk| s == b"AACCGG" && *kk == k)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut draws = script.to_vec().into_iter();
        let total = draws.len();
        engine
            .expect_draw()
            .times(..=total)
            .returning(move |out: &mut [u8]| {
                out.copy_from_slice(draws.next().expect("script exhausted"));
                Ok(())
            });
        engine.expect_reset().times(1).return_const(());
        engine
    }

    fn run(engine: MockShuffleEngine, mode: GenerationMode, k: usize) -> (Emission, String) {
        let mut shuffler = Shuffler::new(engine, StdRng::seed_from_u64(0));
        let mut out = FastaWriter::new(Vec::new());
        let emission = shuffler.emit(&record(), mode, k, &mut out).unwrap();
        (emission, String::from_utf8(out.into_inner()).unwrap())
    }

    #[test]
    fn test_permutation_count_emits_every_draw() {
        let engine = scripted(&[b"AACCGG", b"CCAAGG", b"GGCCAA"], 2);
        let (emission, text) = run(engine, GenerationMode::PermutationCount(nz(3)), 2);

        assert_eq!(emission.variants, 3);
        assert_eq!(emission.attempts, 3);
        assert_eq!(
            text,
            ">seq1-perm1\nAACCGG\n>seq1-perm2\nCCAAGG\n>seq1-perm3\nGGCCAA\n"
        );
    }

    #[test]
    fn test_retry_stops_at_first_distinct() {
        let engine = scripted(&[b"AACCGG", b"AACCGG", b"CCGGAA", b"GGAACC"], 3);
        let (emission, text) = run(engine, GenerationMode::RetryUntilDistinct(nz(10)), 3);

        assert_eq!(
            emission,
            Emission {
                variants: 1,
                attempts: 3,
                distinct: true
            }
        );
        assert_eq!(text, ">seq1\nCCGGAA\n");
    }

    #[test]
    fn test_retry_exhaustion_writes_last_attempt() {
        let engine = scripted(&[b"AACCGG", b"AACCGG"], 2);
        let (emission, text) = run(engine, GenerationMode::RetryUntilDistinct(nz(2)), 2);

        assert!(!emission.distinct);
        assert_eq!(emission.attempts, 2);
        assert_eq!(text, ">seq1\nAACCGG\n");
    }

    #[test]
    fn test_engine_is_reset_after_failed_draw() {
        let mut engine = MockShuffleEngine::new();
        engine.expect_set_random_source().return_const(());
        engine.expect_prime().returning(|_, _| Ok(()));
        engine
            .expect_draw()
            .times(1)
            .returning(|_| Err(EngineError::NotPrimed));
        engine.expect_reset().times(1).return_const(());

        let mut shuffler = Shuffler::new(engine, StdRng::seed_from_u64(0));
        let mut out = FastaWriter::new(Vec::new());
        let err = shuffler
            .emit(&record(), GenerationMode::PermutationCount(nz(2)), 2, &mut out)
            .unwrap_err();
        assert!(matches!(err, KshuffleError::Engine(EngineError::NotPrimed)));
        assert!(out.into_inner().is_empty());
    }

    #[test]
    fn test_failed_prime_skips_draw() {
        let mut engine = MockShuffleEngine::new();
        engine.expect_set_random_source().return_const(());
        engine
            .expect_prime()
            .returning(|_, _| Err(EngineError::InvalidKletSize));
        engine.expect_draw().never();
        engine.expect_reset().never();

        let mut shuffler = Shuffler::new(engine, StdRng::seed_from_u64(0));
        let mut out = FastaWriter::new(Vec::new());
        let result = shuffler.emit(&record(), GenerationMode::RetryUntilDistinct(nz(1)), 0, &mut out);
        assert!(result.is_err());
    }
}
