use crate::bio::fasta::{ReaderLimits, DEFAULT_MAX_IDENTIFIER_LENGTH, DEFAULT_MAX_SEQUENCE_LENGTH};
use crate::shuffle::GenerationMode;
use crate::KshuffleError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// User-facing settings, as read from a TOML file and overridden by flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShuffleConfig {
    /// Size of the k-lets whose counts are preserved
    pub klet: usize,
    /// Variants per record; 1 selects retry-until-distinct mode
    pub permutations: usize,
    /// Draw budget when looking for a shuffle that differs from the input
    pub retries: usize,
    /// Random seed; derived from the wall clock when absent
    pub seed: Option<u64>,
    /// Echo every input record before its shuffles
    pub show_original: bool,
    pub max_identifier_length: usize,
    pub max_sequence_length: usize,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            klet: 2,
            permutations: 1,
            retries: 10,
            seed: None,
            show_original: false,
            max_identifier_length: DEFAULT_MAX_IDENTIFIER_LENGTH,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ShuffleConfig, KshuffleError> {
    let contents = std::fs::read_to_string(path)?;
    let config: ShuffleConfig = toml::from_str(&contents)
        .map_err(|e| KshuffleError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

/// Seconds since the Unix epoch, the default seed.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Validated, immutable settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    k: usize,
    mode: GenerationMode,
    show_original: bool,
    seed: u64,
    limits: ReaderLimits,
}

impl RunConfig {
    pub fn new(k: usize, mode: GenerationMode, show_original: bool, seed: u64) -> Result<Self, KshuffleError> {
        if k == 0 {
            return Err(positive("klet", k));
        }
        Ok(Self {
            k,
            mode,
            show_original,
            seed,
            limits: ReaderLimits::default(),
        })
    }

    pub fn from_settings(settings: &ShuffleConfig) -> Result<Self, KshuffleError> {
        let permutations =
            NonZeroUsize::new(settings.permutations).ok_or_else(|| positive("permutations", 0))?;
        let retries = NonZeroUsize::new(settings.retries).ok_or_else(|| positive("retries", 0))?;
        if settings.max_identifier_length == 0 {
            return Err(positive("max_identifier_length", 0));
        }
        if settings.max_sequence_length == 0 {
            return Err(positive("max_sequence_length", 0));
        }

        let mut config = Self::new(
            settings.klet,
            GenerationMode::from_counts(permutations, retries),
            settings.show_original,
            settings.seed.unwrap_or_else(time_seed),
        )?;
        config.limits = ReaderLimits {
            max_identifier_length: settings.max_identifier_length,
            max_sequence_length: settings.max_sequence_length,
        };
        Ok(config)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn show_original(&self) -> bool {
        self.show_original
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn limits(&self) -> ReaderLimits {
        self.limits
    }
}

fn positive(name: &str, value: usize) -> KshuffleError {
    KshuffleError::Config(format!(
        "invalid {} value ({}). Must be a number larger than zero",
        name, value
    ))
}
