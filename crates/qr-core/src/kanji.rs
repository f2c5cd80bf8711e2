//! Kanji-mode code values: Shift-JIS two-byte encodings folded into a 13-bit
//! number, per ISO/IEC 18004 §7.4.7.

use crate::{QrError, QrResult};
use encoding_rs::SHIFT_JIS;

/// Encode one character's Shift-JIS bytes into the 13-bit kanji code value.
pub fn kanji_character_value(c: char) -> QrResult<u16> {
    let mut buf = [0u8; 4];
    let s = c.encode_utf8(&mut buf);
    let (cow, _, had_errors) = SHIFT_JIS.encode(s);
    if had_errors || cow.len() != 2 {
        return Err(QrError::ShiftJisUnsupported { character: c });
    }
    let value = ((cow[0] as u32) << 8) | (cow[1] as u32);

    let folded = if (0x8140..=0x9FFC).contains(&value) {
        value - 0x8140
    } else if (0xE040..=0xEBBF).contains(&value) {
        value - 0xC140
    } else {
        return Err(QrError::ShiftJisUnsupported { character: c });
    };

    let msb = folded >> 8;
    let lsb = folded & 0xFF;
    Ok(((msb * 0xC0 + lsb) & 0x1FFF) as u16)
}

/// Inverse of [`kanji_character_value`]: decode a 13-bit kanji code back to a character.
pub fn kanji_value_to_char(code: u16) -> QrResult<char> {
    let code = code as u32;
    let msb = code / 0xC0;
    let lsb = code % 0xC0;
    let folded = (msb << 8) | lsb;

    let value = if folded <= 0x9FFC - 0x8140 {
        folded + 0x8140
    } else {
        folded + 0xC140
    };

    let bytes = [(value >> 8) as u8, (value & 0xFF) as u8];
    let (cow, _, had_errors) = SHIFT_JIS.decode(&bytes);
    if had_errors {
        return Err(QrError::decoder_parse(format!(
            "kanji code {:#06x} does not decode to a valid Shift-JIS character",
            code
        )));
    }
    cow.chars()
        .next()
        .ok_or_else(|| QrError::decoder_parse("empty kanji decode"))
}
