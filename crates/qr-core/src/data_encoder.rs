//! Growable bit buffer that accumulates mode-tagged segments and pads them
//! out to a codeword vector sized to the target symbol.

use crate::bit_buffer::BitBuffer;
use crate::kanji::kanji_character_value;
use crate::version::EncodingVariant;
use crate::{QrError, QrResult};

pub static NUMERIC_CHARSET: &str = "0123456789";
pub static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

pub(crate) fn numeric_value(c: char) -> Option<u32> {
    NUMERIC_CHARSET.find(c).map(|i| i as u32)
}

pub(crate) fn alphanumeric_value(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET.find(c).map(|i| i as u32)
}

/// Crate-visible re-exports for the segmenter, which needs to test character
/// representability without pulling in the rest of `DataEncoder`.
pub(crate) fn numeric_value_pub(c: char) -> Option<u32> {
    numeric_value(c)
}

pub(crate) fn alphanumeric_value_pub(c: char) -> Option<u32> {
    alphanumeric_value(c)
}

pub struct DataEncoder {
    variant: EncodingVariant,
    bits: BitBuffer,
}

impl DataEncoder {
    pub fn new(variant: EncodingVariant) -> Self {
        DataEncoder {
            variant,
            bits: BitBuffer(Vec::new()),
        }
    }

    pub fn bit_len(&self) -> usize {
        self.bits.0.len()
    }

    pub fn append_integer(&mut self, value: u32, numbits: u32) -> QrResult<()> {
        if numbits == 0 {
            return Err(QrError::precondition("number of bits must be positive"));
        }
        if numbits > 31 {
            return Err(QrError::precondition(format!(
                "{} bits exceeds the 31-bit append_bits limit",
                numbits
            )));
        }
        if value >= (1u32 << numbits) {
            return Err(QrError::precondition(format!(
                "value {} does not fit in {} bits",
                value, numbits
            )));
        }
        self.bits.append_bits(value, numbits as u8);
        Ok(())
    }

    pub fn append_numeric(&mut self, s: &str) -> QrResult<()> {
        let chars: Vec<char> = s.chars().collect();
        let values: QrResult<Vec<u32>> = chars
            .iter()
            .map(|&c| {
                numeric_value(c)
                    .ok_or_else(|| QrError::precondition(format!("{:?} is not a numeric digit", c)))
            })
            .collect();
        let values = values?;

        let count_bits = self.variant.numeric_count_bits();
        if values.len() >= (1usize << count_bits) {
            return Err(QrError::precondition("numeric string too long"));
        }

        self.append_integer(0b0001, 4)?;
        self.append_integer(values.len() as u32, count_bits)?;

        let mut idx = 0;
        while idx != values.len() {
            let chunk_size = (values.len() - idx).min(3);
            let numbits = 1 + 3 * chunk_size as u32;
            let mut chunk_value = 0u32;
            for _ in 0..chunk_size {
                chunk_value = chunk_value * 10 + values[idx];
                idx += 1;
            }
            self.append_integer(chunk_value, numbits)?;
        }
        Ok(())
    }

    pub fn append_alphanumeric(&mut self, s: &str) -> QrResult<()> {
        let chars: Vec<char> = s.chars().collect();
        let values: QrResult<Vec<u32>> = chars
            .iter()
            .map(|&c| {
                alphanumeric_value(c).ok_or_else(|| {
                    QrError::precondition(format!("{:?} is not alphanumeric-mode representable", c))
                })
            })
            .collect();
        let values = values?;

        let count_bits = self.variant.alphanumeric_count_bits();
        if values.len() >= (1usize << count_bits) {
            return Err(QrError::precondition("alphanumeric string too long"));
        }

        self.append_integer(0b0010, 4)?;
        self.append_integer(values.len() as u32, count_bits)?;

        let mut idx = 0;
        while idx != values.len() {
            let chunk_size = (values.len() - idx).min(2);
            let numbits = 1 + 5 * chunk_size as u32;
            let mut chunk_value = 0u32;
            for _ in 0..chunk_size {
                chunk_value = chunk_value * 45 + values[idx];
                idx += 1;
            }
            self.append_integer(chunk_value, numbits)?;
        }
        Ok(())
    }

    pub fn append_bytes(&mut self, data: &[u8]) -> QrResult<()> {
        let count_bits = self.variant.byte_count_bits();
        if data.len() >= (1usize << count_bits) {
            return Err(QrError::precondition("byte sequence too long"));
        }
        self.append_integer(0b0100, 4)?;
        self.append_integer(data.len() as u32, count_bits)?;
        for &b in data {
            self.append_integer(b as u32, 8)?;
        }
        Ok(())
    }

    pub fn append_kanji(&mut self, s: &str) -> QrResult<()> {
        let values: QrResult<Vec<u16>> = s.chars().map(kanji_character_value).collect();
        let values = values?;

        let count_bits = self.variant.kanji_count_bits();
        if values.len() >= (1usize << count_bits) {
            return Err(QrError::precondition("kanji string too long"));
        }

        self.append_integer(0b1000, 4)?;
        self.append_integer(values.len() as u32, count_bits)?;
        for value in values {
            self.append_integer(value as u32, 13)?;
        }
        Ok(())
    }

    pub fn append_eci_designator(&mut self, value: u32) -> QrResult<()> {
        if value > 999_999 {
            return Err(QrError::precondition(format!(
                "bad ECI designator {}",
                value
            )));
        }
        self.append_integer(0b0111, 4)?;
        if value <= 127 {
            self.append_integer(value, 8)?;
        } else if value <= 16383 {
            self.append_integer(0x8000 | value, 16)?;
        } else {
            self.append_integer(0xC0_0000 | value, 24)?;
        }
        Ok(())
    }

    pub fn append_structured_append_marker(
        &mut self,
        index: u32,
        count: u32,
        parity: u8,
    ) -> QrResult<()> {
        if index > 15 {
            return Err(QrError::precondition(
                "structured append index out of range",
            ));
        }
        if !(1..=16).contains(&count) {
            return Err(QrError::precondition(
                "structured append count out of range",
            ));
        }
        self.append_integer(0b0011, 4)?;
        self.append_integer(index, 4)?;
        self.append_integer(count - 1, 4)?;
        self.append_integer(parity as u32, 8)?;
        Ok(())
    }

    /// Consume the encoder into a codeword vector sized exactly
    /// `data_codeword_capacity`, applying terminator + zero padding + the
    /// alternating `0xEC, 0x11` pad codewords. `None` if the accumulated
    /// bits do not fit even without a terminator.
    pub fn to_codewords(self, data_codeword_capacity: usize) -> Option<Vec<u8>> {
        let bits_available = data_codeword_capacity * 8;
        if self.bits.0.len() > bits_available {
            return None;
        }

        let slack = bits_available - self.bits.0.len();
        let zero_padding_bits = slack.min((slack.wrapping_sub(4)) % 8 + 4);

        let mut bits = self.bits.0;
        bits.resize(bits.len() + zero_padding_bits, false);
        debug_assert_eq!(bits.len() % 8, 0);

        let mut words: Vec<u8> = bits
            .chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b as u8)))
            .collect();

        let mut pad_word: u8 = 0b1110_1100;
        while words.len() != data_codeword_capacity {
            words.push(pad_word);
            pad_word ^= 0b1111_1101;
        }
        Some(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::EncodingVariant;

    #[test]
    fn annex_i_example_codewords() {
        // ISO/IEC 18004 Annex I: "01234567" at version 1-M.
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        enc.append_numeric("01234567").unwrap();
        let words = enc.to_codewords(16).unwrap();
        assert_eq!(
            words,
            vec![
                0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
                0xEC, 0x11,
            ]
        );
    }

    #[test]
    fn eci_designator_widths() {
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        enc.append_eci_designator(9).unwrap();
        assert_eq!(enc.bit_len(), 4 + 8);
    }

    #[test]
    fn too_large_for_capacity_returns_none() {
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        enc.append_bytes(&[0u8; 100]).unwrap();
        assert!(enc.to_codewords(4).is_none());
    }

    #[test]
    fn rejects_non_numeric_characters() {
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        assert!(enc.append_numeric("12a").is_err());
    }
}
