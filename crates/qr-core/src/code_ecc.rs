/// The error correction level in a QR Code symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum CodeEcc {
    /// The QR Code can tolerate about  7% erroneous codewords.
    Low,
    /// The QR Code can tolerate about 15% erroneous codewords.
    Medium,
    /// The QR Code can tolerate about 25% erroneous codewords.
    Quartile,
    /// The QR Code can tolerate about 30% erroneous codewords.
    High,
}

impl CodeEcc {
    // Returns an unsigned 2-bit integer (in the range 0 to 3).
    pub fn ordinal(self) -> usize {
        use CodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    // Returns an unsigned 2-bit integer (in the range 0 to 3).
    pub fn format_bits(self) -> u8 {
        use CodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }

    /// Inverse of [`CodeEcc::format_bits`].
    pub fn from_format_bits(bits: u8) -> Option<CodeEcc> {
        use CodeEcc::*;
        match bits {
            1 => Some(Low),
            0 => Some(Medium),
            3 => Some(Quartile),
            2 => Some(High),
            _ => None,
        }
    }
}
