use crate::bio::alphabet::is_valid_sequence;
use std::borrow::Cow;

/// Marker that opens every identifier line.
pub const ID_MARKER: u8 = b'>';

/// One identifier line paired with one sequence line.
///
/// The identifier is kept verbatim, marker included, and the sequence keeps
/// its original case. Both are raw bytes so that output reproduces the input
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FastaRecord {
    identifier: Vec<u8>,
    sequence: Vec<u8>,
}

impl FastaRecord {
    /// Build a record, checking the same invariants the reader enforces.
    ///
    /// Returns `None` when the identifier lacks the marker or a name after
    /// it, or when the sequence is empty or holds non-nucleotide characters.
    pub fn new(identifier: impl Into<Vec<u8>>, sequence: impl Into<Vec<u8>>) -> Option<Self> {
        let identifier = identifier.into();
        let sequence = sequence.into();

        if identifier.len() < 2 || identifier[0] != ID_MARKER {
            return None;
        }
        if !is_valid_sequence(&sequence) {
            return None;
        }
        Some(Self::from_validated(identifier, sequence))
    }

    pub(crate) fn from_validated(identifier: Vec<u8>, sequence: Vec<u8>) -> Self {
        Self {
            identifier,
            sequence,
        }
    }

    /// The full identifier line, including the leading `>`.
    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    /// The identifier without its marker.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.identifier[1..])
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn header(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.identifier)
    }
}
