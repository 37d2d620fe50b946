use crate::core::config::{load_config, ShuffleConfig};
use clap::Parser;
use std::path::PathBuf;

const FORMAT_HELP: &str = "\
Nucleotide sequences in the input FASTA file must be on a single line.
This is a valid input file:
  >dummy1
  AGTAGTAGTAGTAGTAGTAGTAGTAGTAGTAGAGTG
  >dummy2
  CTGAGAGTCACACATGATTTTACAACAACCATGAAG

This is not (the sequences are wrapped):
  >dummy1
  AGTAGTAGTAGTAGTAGTAGTAGTAG
  TAGTAGAGTG

Re-format multi-line files first, e.g. with 'seqkit seq -w 0' or 'fasta_formatter'.";

#[derive(Parser, Debug)]
#[command(
    name = "kshuffle",
    version,
    about = "Shuffle FASTA sequences while preserving their k-let counts",
    long_about = "Reads single-line FASTA records and writes, for each one, a random \
                  permutation of its sequence with the same k-let (k-mer) composition. \
                  By default one shuffle is written per record, retrying until it differs \
                  from the input.",
    after_long_help = FORMAT_HELP
)]
pub struct Cli {
    /// Size of the k-lets whose counts are preserved [default: 2]
    #[arg(short = 'k', long = "klet", value_name = "N")]
    pub klet: Option<usize>,

    /// Print N permutations per input sequence, without checking that they
    /// differ from the input [default: 1]
    #[arg(short = 'n', long, value_name = "N")]
    pub permutations: Option<usize>,

    /// Draws to try for a shuffle that differs from the input; after that a
    /// warning is logged and the last draw is written [default: 10]
    #[arg(short = 'r', long, value_name = "N")]
    pub retries: Option<usize>,

    /// Seed for the random number generator [default: current time]
    #[arg(short = 's', long, value_name = "N")]
    pub seed: Option<u64>,

    /// Print each original (unshuffled) record before its shuffles
    #[arg(short = 'o', long)]
    pub show_original: bool,

    /// Input FASTA file [default: stdin]
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output FASTA file [default: stdout]
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML file with default settings; flags take precedence
    #[arg(short = 'c', long, value_name = "FILE", env = "KSHUFFLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Settings from the config file, if any, with flags applied on top.
    pub fn settings(&self) -> crate::Result<ShuffleConfig> {
        let mut settings = match &self.config {
            Some(path) => load_config(path)?,
            None => ShuffleConfig::default(),
        };

        if let Some(k) = self.klet {
            settings.klet = k;
        }
        if let Some(n) = self.permutations {
            settings.permutations = n;
        }
        if let Some(r) = self.retries {
            settings.retries = r;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.show_original {
            settings.show_original = true;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_map_to_settings() {
        let cli = Cli::try_parse_from(["kshuffle", "-k", "3", "-n", "5", "-s", "42", "-o"]).unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.klet, 3);
        assert_eq!(settings.permutations, 5);
        assert_eq!(settings.retries, 10);
        assert_eq!(settings.seed, Some(42));
        assert!(settings.show_original);
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "klet = 4\nretries = 3\nshow_original = true").unwrap();

        let args = [
            OsStr::new("kshuffle"),
            OsStr::new("-c"),
            file.path().as_os_str(),
            OsStr::new("-k"),
            OsStr::new("1"),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.klet, 1);
        assert_eq!(settings.retries, 3);
        assert!(settings.show_original);
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(Cli::try_parse_from(["kshuffle", "-k", "two"]).is_err());
    }
}
