//! Decode-side bitstream parser: walks the mode-indicator directive table
//! (ISO/IEC 18004 §7.4) and reconstructs the original payload string plus
//! any ECI / structured-append metadata.

use crate::kanji::kanji_value_to_char;
use crate::version::EncodingVariant;
use crate::{QrError, QrResult};

const ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Metadata surfaced alongside the decoded text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMetadata {
    pub eci: Option<u32>,
    pub structured_append: Option<StructuredAppend>,
    pub fnc1_application_indicator: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredAppend {
    pub index: u32,
    pub count: u32,
    pub parity: u8,
}

struct BitReader<'a> {
    bits: &'a [bool],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bits: &'a [bool]) -> Self {
        BitReader { bits, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    fn read_bits(&mut self, n: u32) -> QrResult<u32> {
        if self.remaining() < n as usize {
            return Err(QrError::decoder_parse("bitstream ended mid-segment"));
        }
        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) | u32::from(self.bits[self.pos]);
            self.pos += 1;
        }
        Ok(value)
    }

    fn read_bit(&mut self) -> QrResult<bool> {
        Ok(self.read_bits(1)? != 0)
    }
}

/// Maps an ECI assignment value to the `encoding_rs` label used to decode
/// subsequent byte-mode segments. Covers the ISO-8859 family and UTF-8; an
/// unmapped value falls back to treating bytes as Latin-1 code points.
fn eci_to_label(eci: u32) -> Option<&'static str> {
    Some(match eci {
        1 | 2 => "windows-1252",
        3 => "iso-8859-1",
        4 => "iso-8859-2",
        5 => "iso-8859-3",
        6 => "iso-8859-4",
        7 => "iso-8859-5",
        8 => "iso-8859-6",
        9 => "iso-8859-7",
        10 => "iso-8859-8",
        11 => "iso-8859-9",
        13 => "iso-8859-11",
        15 => "iso-8859-13",
        16 => "iso-8859-14",
        17 => "iso-8859-15",
        18 => "iso-8859-16",
        20 => "shift-jis",
        26 => "utf-8",
        _ => return None,
    })
}

fn decode_bytes_with_eci(bytes: &[u8], eci: Option<u32>) -> String {
    match eci.and_then(eci_to_label) {
        Some("utf-8") | None => String::from_utf8_lossy(bytes).into_owned(),
        Some(label) => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => bytes.iter().map(|&b| b as char).collect(),
        },
    }
}

/// Parses a flat bitstream (post de-interleave, concatenated data codeword
/// bits) into the decoded payload text plus metadata.
pub fn parse_bitstream(
    bits: &[bool],
    variant: EncodingVariant,
) -> QrResult<(String, ParsedMetadata)> {
    let mut reader = BitReader::new(bits);
    let mut text = String::new();
    let mut meta = ParsedMetadata::default();
    let mut pending_bytes: Vec<u8> = Vec::new();
    let mut current_eci: Option<u32> = None;

    let flush_bytes = |pending: &mut Vec<u8>, text: &mut String, eci: Option<u32>| {
        if !pending.is_empty() {
            text.push_str(&decode_bytes_with_eci(pending, eci));
            pending.clear();
        }
    };

    loop {
        if reader.remaining() < 4 {
            break;
        }
        let directive = reader.read_bits(4)?;
        match directive {
            0b0000 => break, // terminator
            0b0001 => {
                flush_bytes(&mut pending_bytes, &mut text, current_eci);
                let count = reader.read_bits(variant.numeric_count_bits())? as usize;
                let mut remaining = count;
                while remaining > 0 {
                    let group = remaining.min(3);
                    let numbits = match group {
                        3 => 10,
                        2 => 7,
                        _ => 4,
                    };
                    let value = reader.read_bits(numbits)?;
                    if value as usize >= 10usize.pow(group as u32) {
                        return Err(QrError::decoder_parse("invalid numeric group value"));
                    }
                    text.push_str(&format!("{:0width$}", value, width = group));
                    remaining -= group;
                }
            }
            0b0010 => {
                flush_bytes(&mut pending_bytes, &mut text, current_eci);
                let count = reader.read_bits(variant.alphanumeric_count_bits())? as usize;
                let mut remaining = count;
                while remaining > 0 {
                    if remaining >= 2 {
                        let value = reader.read_bits(11)?;
                        if value >= 45 * 45 {
                            return Err(QrError::decoder_parse("invalid alphanumeric pair"));
                        }
                        let (a, b) = (value / 45, value % 45);
                        text.push(ALPHANUMERIC_CHARSET.as_bytes()[a as usize] as char);
                        text.push(ALPHANUMERIC_CHARSET.as_bytes()[b as usize] as char);
                        remaining -= 2;
                    } else {
                        let value = reader.read_bits(6)?;
                        if value as usize >= ALPHANUMERIC_CHARSET.len() {
                            return Err(QrError::decoder_parse("invalid alphanumeric char"));
                        }
                        text.push(ALPHANUMERIC_CHARSET.as_bytes()[value as usize] as char);
                        remaining -= 1;
                    }
                }
            }
            0b0100 => {
                let count = reader.read_bits(variant.byte_count_bits())? as usize;
                for _ in 0..count {
                    pending_bytes.push(reader.read_bits(8)? as u8);
                }
            }
            0b1000 => {
                flush_bytes(&mut pending_bytes, &mut text, current_eci);
                let count = reader.read_bits(variant.kanji_count_bits())? as usize;
                for _ in 0..count {
                    let code = reader.read_bits(13)? as u16;
                    text.push(kanji_value_to_char(code)?);
                }
            }
            0b0111 => {
                flush_bytes(&mut pending_bytes, &mut text, current_eci);
                let value = if !reader.read_bit()? {
                    reader.read_bits(7)?
                } else if !reader.read_bit()? {
                    reader.read_bits(14)?
                } else if !reader.read_bit()? {
                    reader.read_bits(21)?
                } else {
                    return Err(QrError::decoder_parse("invalid ECI designator prefix"));
                };
                current_eci = Some(value);
                meta.eci = Some(value);
            }
            0b0011 => {
                let index = reader.read_bits(4)?;
                let count = reader.read_bits(4)? + 1;
                let parity = reader.read_bits(8)? as u8;
                meta.structured_append = Some(StructuredAppend {
                    index,
                    count,
                    parity,
                });
            }
            0b1001 => {
                let indicator = reader.read_bits(8)? as u8;
                meta.fnc1_application_indicator = Some(indicator);
            }
            other => {
                return Err(QrError::decoder_parse(format!(
                    "unknown bitstream directive {:#06b}",
                    other
                )));
            }
        }
    }

    flush_bytes(&mut pending_bytes, &mut text, current_eci);
    Ok((text, meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_encoder::DataEncoder;

    fn bits_of(encoder: DataEncoder) -> Vec<bool> {
        let words = encoder.to_codewords(32).unwrap();
        let mut bits = Vec::new();
        for b in words {
            for i in (0..8).rev() {
                bits.push((b >> i) & 1 != 0);
            }
        }
        bits
    }

    #[test]
    fn roundtrip_numeric() {
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        enc.append_numeric("01234567").unwrap();
        let bits = bits_of(enc);
        let (text, _meta) = parse_bitstream(&bits, EncodingVariant::Small).unwrap();
        assert_eq!(text, "01234567");
    }

    #[test]
    fn roundtrip_alphanumeric() {
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        enc.append_alphanumeric("HELLO WORLD").unwrap();
        let bits = bits_of(enc);
        let (text, _meta) = parse_bitstream(&bits, EncodingVariant::Small).unwrap();
        assert_eq!(text, "HELLO WORLD");
    }

    #[test]
    fn roundtrip_bytes() {
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        enc.append_bytes("hello, world!".as_bytes()).unwrap();
        let bits = bits_of(enc);
        let (text, _meta) = parse_bitstream(&bits, EncodingVariant::Small).unwrap();
        assert_eq!(text, "hello, world!");
    }

    #[test]
    fn roundtrip_structured_append() {
        let mut enc = DataEncoder::new(EncodingVariant::Small);
        enc.append_structured_append_marker(1, 4, 0x00).unwrap();
        enc.append_numeric("123").unwrap();
        let bits = bits_of(enc);
        let (text, meta) = parse_bitstream(&bits, EncodingVariant::Small).unwrap();
        assert_eq!(text, "123");
        assert_eq!(
            meta.structured_append,
            Some(StructuredAppend {
                index: 1,
                count: 4,
                parity: 0
            })
        );
    }

    #[test]
    fn unknown_directive_is_a_parse_error() {
        // 1010 is not in the directive table.
        let bits = vec![true, false, true, false, false, false, false, false];
        let err = parse_bitstream(&bits, EncodingVariant::Small).unwrap_err();
        assert!(matches!(err, QrError::DecoderParse { .. }));
    }
}
