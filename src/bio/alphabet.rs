/// IUPAC nucleotide codes accepted in a sequence line (upper case).
pub const NUCLEOTIDE_CODES: &[u8; 15] = b"ACGTRYSWKMBDHVN";

/// Is `c` one of the accepted nucleotide or ambiguity codes, in either case?
#[inline]
pub fn is_nucleotide(c: u8) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        b'A' | b'C'
            | b'G'
            | b'T'
            | b'R'
            | b'Y'
            | b'S'
            | b'W'
            | b'K'
            | b'M'
            | b'B'
            | b'D'
            | b'H'
            | b'V'
            | b'N'
    )
}

/// Returns true when `s` is non-empty and made only of nucleotide codes.
pub fn is_valid_sequence(s: &[u8]) -> bool {
    !s.is_empty() && s.iter().all(|&c| is_nucleotide(c))
}
