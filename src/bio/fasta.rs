//! Strict single-line FASTA reading and writing.
//!
//! Every record is exactly two lines: an identifier line starting with `>`
//! and one sequence line. Anything else (wrapped sequences, blank lines,
//! stray characters) stops the run with a [`FormatError`] naming the line.

use crate::bio::alphabet::is_valid_sequence;
use crate::bio::sequence::{FastaRecord, ID_MARKER};
use std::fmt;
use std::io::{BufRead, Read, Write};
use thiserror::Error;

/// Default ceiling for an identifier line, in bytes, excluding the newline.
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 32_678;
/// Default ceiling for a sequence line, in bytes, excluding the newline.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 1_000_000;

pub const UNSHUFFLED_SUFFIX: &str = "-unshuffled";
pub const PERMUTATION_SUFFIX: &str = "-perm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Identifier,
    Sequence,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Identifier => write!(f, "identifier"),
            LineKind::Sequence => write!(f, "sequence"),
        }
    }
}

/// Fatal input violations. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error(
        "line {line} is longer than the {kind} line limit ({limit} bytes). \
         Increase the limit instead of truncating the input"
    )]
    LineTooLong {
        line: usize,
        kind: LineKind,
        limit: usize,
    },

    #[error("got too-short identifier line (line {line}), expecting '>' followed by a name")]
    IdentifierTooShort { line: usize },

    #[error(
        "input looks like a multi-line FASTA file (line {line} should start with '>' \
         but contains nucleotide sequence). One sequence line per record is required, \
         re-format the input first (e.g. 'fasta_formatter' or 'seqkit seq -w 0')"
    )]
    MultilineInputDetected { line: usize },

    #[error("invalid FASTA identifier on line {line} (expecting a line starting with '>')")]
    InvalidIdentifier { line: usize },

    #[error("missing nucleotide sequence line in input (line {line})")]
    MissingSequenceLine { line: usize },

    #[error("invalid nucleotide sequence on line {line}")]
    InvalidSequence { line: usize },
}

impl FormatError {
    /// The offending line number.
    pub fn line(&self) -> usize {
        match self {
            FormatError::LineTooLong { line, .. }
            | FormatError::IdentifierTooShort { line }
            | FormatError::MultilineInputDetected { line }
            | FormatError::InvalidIdentifier { line }
            | FormatError::MissingSequenceLine { line }
            | FormatError::InvalidSequence { line } => *line,
        }
    }
}

/// Maximum accepted line lengths, newline excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderLimits {
    pub max_identifier_length: usize,
    pub max_sequence_length: usize,
}

impl Default for ReaderLimits {
    fn default() -> Self {
        Self {
            max_identifier_length: DEFAULT_MAX_IDENTIFIER_LENGTH,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    ExpectIdentifier,
    Exhausted,
    Failed,
}

/// Pull parser producing one [`FastaRecord`] per call.
pub struct RecordReader<R> {
    reader: R,
    limits: ReaderLimits,
    line: usize,
    state: ReaderState,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_limits(reader, ReaderLimits::default())
    }

    pub fn with_limits(reader: R, limits: ReaderLimits) -> Self {
        Self {
            reader,
            limits,
            line: 1,
            state: ReaderState::ExpectIdentifier,
        }
    }

    /// Line number the next identifier line is expected on.
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Read the next record.
    ///
    /// `Ok(None)` means the input ended cleanly before an identifier line.
    /// Any error is terminal: later calls return `Ok(None)`.
    pub fn read_record(&mut self) -> crate::Result<Option<FastaRecord>> {
        if self.state != ReaderState::ExpectIdentifier {
            return Ok(None);
        }

        match self.next_unit() {
            Ok(Some(record)) => {
                self.line += 2;
                Ok(Some(record))
            }
            Ok(None) => {
                self.state = ReaderState::Exhausted;
                Ok(None)
            }
            Err(e) => {
                self.state = ReaderState::Failed;
                Err(e)
            }
        }
    }

    fn next_unit(&mut self) -> crate::Result<Option<FastaRecord>> {
        let id_line = self.line;
        let identifier = match self.read_line(self.limits.max_identifier_length)? {
            Some(line) => line,
            None => return Ok(None),
        };

        if identifier.len() > self.limits.max_identifier_length {
            return Err(FormatError::LineTooLong {
                line: id_line,
                kind: LineKind::Identifier,
                limit: self.limits.max_identifier_length,
            }
            .into());
        }
        if identifier.len() < 2 {
            return Err(FormatError::IdentifierTooShort { line: id_line }.into());
        }
        if identifier[0] != ID_MARKER {
            // A bare nucleotide line where an identifier belongs is almost
            // always a wrapped sequence from a multi-line FASTA file.
            let err = if is_valid_sequence(&identifier) {
                FormatError::MultilineInputDetected { line: id_line }
            } else {
                FormatError::InvalidIdentifier { line: id_line }
            };
            return Err(err.into());
        }

        let seq_line = id_line + 1;
        let sequence = self
            .read_line(self.limits.max_sequence_length)?
            .ok_or(FormatError::MissingSequenceLine { line: seq_line })?;

        if sequence.len() > self.limits.max_sequence_length {
            return Err(FormatError::LineTooLong {
                line: seq_line,
                kind: LineKind::Sequence,
                limit: self.limits.max_sequence_length,
            }
            .into());
        }
        if !is_valid_sequence(&sequence) {
            return Err(FormatError::InvalidSequence { line: seq_line }.into());
        }

        Ok(Some(FastaRecord::from_validated(identifier, sequence)))
    }

    /// Read one line, stripping a single trailing `\n`.
    ///
    /// At most `limit + 2` bytes are consumed so an over-long line is detected
    /// without buffering all of it.
    fn read_line(&mut self, limit: usize) -> std::io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let n = (&mut self.reader)
            .take((limit as u64).saturating_add(2))
            .read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        Ok(Some(buf))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = crate::Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// Line-oriented FASTA output, one identifier line and one sequence line per
/// unit, never re-wrapped.
pub struct FastaWriter<W: Write> {
    writer: W,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// The untouched record, identifier suffixed with `-unshuffled`.
    pub fn write_original(&mut self, record: &FastaRecord) -> std::io::Result<()> {
        self.write_unit(record.identifier(), UNSHUFFLED_SUFFIX, record.sequence())
    }

    /// Permutation `index` (1-based), identifier suffixed with `-perm<index>`.
    pub fn write_permutation(
        &mut self,
        record: &FastaRecord,
        index: usize,
        sequence: &[u8],
    ) -> std::io::Result<()> {
        let suffix = format!("{}{}", PERMUTATION_SUFFIX, index);
        self.write_unit(record.identifier(), &suffix, sequence)
    }

    /// A single shuffle under the record's own identifier.
    pub fn write_shuffled(&mut self, record: &FastaRecord, sequence: &[u8]) -> std::io::Result<()> {
        self.write_unit(record.identifier(), "", sequence)
    }

    fn write_unit(&mut self, identifier: &[u8], suffix: &str, sequence: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(identifier)?;
        self.writer.write_all(suffix.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.write_all(sequence)?;
        self.writer.write_all(b"\n")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
