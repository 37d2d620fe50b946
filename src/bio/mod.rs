pub mod alphabet;
pub mod fasta;
pub mod sequence;

pub use fasta::{FastaWriter, FormatError, LineKind, ReaderLimits, RecordReader};
pub use sequence::FastaRecord;
