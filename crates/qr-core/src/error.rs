use thiserror::Error;

/// All ways an encode or decode call through this crate can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrError {
    /// Invalid version/level, out-of-range integer for a requested bit width,
    /// a character not representable in the requested mode, or a payload too
    /// large for an explicitly requested symbol.
    #[error("precondition violated: {message}")]
    Precondition { message: String },

    /// No version in the caller's preference list can hold the payload.
    #[error("payload of {bit_length} bits fits no offered (version, level) pair")]
    Capacity { bit_length: usize },

    /// Kanji mode requested for a character with no 2-byte Shift-JIS encoding
    /// in the ranges the standard allows.
    #[error("character {character:?} has no representable Shift-JIS kanji code")]
    ShiftJisUnsupported { character: char },

    /// Grid size wrong, format block uncorrectable, or version mismatch.
    #[error("decoder format error: {message}")]
    DecoderFormat { message: String },

    /// A Reed-Solomon block could not be decoded.
    #[error("reed-solomon block {block_index} undecodable ({errors_attempted} errors assumed)")]
    DecoderRs {
        block_index: usize,
        errors_attempted: usize,
    },

    /// Bit-stream ended mid-segment, unknown directive, or invalid count.
    #[error("bitstream parse error: {message}")]
    DecoderParse { message: String },
}

impl QrError {
    pub fn precondition(message: impl Into<String>) -> Self {
        QrError::Precondition {
            message: message.into(),
        }
    }

    pub fn decoder_format(message: impl Into<String>) -> Self {
        QrError::DecoderFormat {
            message: message.into(),
        }
    }

    pub fn decoder_parse(message: impl Into<String>) -> Self {
        QrError::DecoderParse {
            message: message.into(),
        }
    }
}

pub type QrResult<T> = Result<T, QrError>;
