//! Grid decoder entry point: recovers format/version, undoes masking,
//! de-interleaves, Reed-Solomon corrects each block, and parses the
//! resulting bitstream back into a payload.

use crate::binary_codes::{correct_format_code, correct_version_code};
use crate::bitstream_parser::{parse_bitstream, ParsedMetadata};
use crate::canvas::Canvas;
use crate::code_ecc::CodeEcc;
use crate::mask::Mask;
use crate::rs_decoder::rs_decode_block;
use crate::rs_encoder::rs_deinterleave;
use crate::version::{Version, VersionSpec};
use crate::{QrError, QrResult};

/// What `decode` returns: the recovered text plus everything that was
/// needed to recover it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub text: String,
    pub version: Version,
    pub level: CodeEcc,
    pub pattern: Mask,
    pub metadata: ParsedMetadata,
}

fn get(grid: &[bool], n: i32, x: i32, y: i32) -> bool {
    grid[(y * n + x) as usize]
}

fn read_format_copies(grid: &[bool], n: i32) -> (u32, u32) {
    let mut copy_a = 0u32;
    for i in 0..6 {
        copy_a |= (get(grid, n, 8, i) as u32) << i;
    }
    copy_a |= (get(grid, n, 8, 7) as u32) << 6;
    copy_a |= (get(grid, n, 8, 8) as u32) << 7;
    copy_a |= (get(grid, n, 7, 8) as u32) << 8;
    for i in 9..15 {
        copy_a |= (get(grid, n, 14 - i, 8) as u32) << i;
    }

    let mut copy_b = 0u32;
    for i in 0..8 {
        copy_b |= (get(grid, n, n - 1 - i, 8) as u32) << i;
    }
    for i in 8..15 {
        copy_b |= (get(grid, n, 8, n - 15 + i) as u32) << i;
    }

    (copy_a, copy_b)
}

fn read_version_copies(grid: &[bool], n: i32) -> (u32, u32) {
    let mut copy_a = 0u32; // region at (size-11+i%3, i/3)
    let mut copy_b = 0u32; // region at (i/3, size-11+i%3)
    for i in 0..18 {
        let a = n - 11 + i % 3;
        let b = i / 3;
        copy_a |= (get(grid, n, a, b) as u32) << i;
        copy_b |= (get(grid, n, b, a) as u32) << i;
    }
    (copy_a, copy_b)
}

/// Decodes an `n x n` boolean module grid (no quiet zone; `n = 17 + 4v`).
pub fn decode_grid(grid: &[bool], n: i32) -> QrResult<DecodedSymbol> {
    if grid.len() != (n * n) as usize {
        return Err(QrError::decoder_format(format!(
            "grid claims side {} but has {} modules",
            n,
            grid.len()
        )));
    }
    let version = Version::from_size(n).ok_or_else(|| {
        QrError::decoder_format(format!("grid size {} is not 17 + 4v for v in [1,40]", n))
    })?;

    let (format_a, format_b) = read_format_copies(grid, n);
    let format_data = correct_format_code(format_a)
        .or_else(|| correct_format_code(format_b))
        .ok_or_else(|| QrError::decoder_format("format block not uniquely correctable"))?;
    let level = CodeEcc::from_format_bits(((format_data >> 3) & 0x3) as u8)
        .ok_or_else(|| QrError::decoder_format("invalid error-correction level bits"))?;
    let pattern = Mask::new((format_data & 0x7) as u8);

    if version.value() >= 7 {
        let (version_a, version_b) = read_version_copies(grid, n);
        let recovered = correct_version_code(version_a)
            .or_else(|| correct_version_code(version_b))
            .ok_or_else(|| QrError::decoder_format("version block not uniquely correctable"))?;
        if recovered != u32::from(version.value()) {
            return Err(QrError::decoder_format(format!(
                "version block disagrees with grid size: recovered {} expected {}",
                recovered,
                version.value()
            )));
        }
    }

    log::info!(
        "qr-core: decoded format block -> version {} level {:?} pattern {}",
        version.value(),
        level,
        pattern.value()
    );

    let mut canvas = Canvas::new(version);
    canvas.build_function_patterns();
    let positions = canvas.traversal_positions();

    let spec = VersionSpec::for_version_level(version, level);
    let total_bits = spec.total_codewords * 8;
    if positions.len() < total_bits {
        return Err(QrError::decoder_format(
            "insufficient module capacity for declared version/level",
        ));
    }

    let mut raw_codewords = vec![0u8; spec.total_codewords];
    for (i, &(x, y)) in positions.iter().take(total_bits).enumerate() {
        let bit = get(grid, n, x, y) ^ pattern.invert_at(y, x);
        if bit {
            raw_codewords[i >> 3] |= 1 << (7 - (i & 7));
        }
    }

    let mut blocks = rs_deinterleave(&spec, &raw_codewords);
    let mut data_codewords = Vec::with_capacity(spec.data_codewords());
    for (block_index, block) in blocks.iter_mut().enumerate() {
        let data_len = block.len() - spec.ec_codewords_per_block;
        let corrected = rs_decode_block(block, spec.ec_codewords_per_block, block_index)?;
        log::info!(
            "qr-core: block {} decoded ({} error(s) corrected)",
            block_index,
            corrected
        );
        data_codewords.extend_from_slice(&block[..data_len]);
    }

    let mut bits = Vec::with_capacity(data_codewords.len() * 8);
    for byte in &data_codewords {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1 != 0);
        }
    }

    let (text, metadata) = parse_bitstream(&bits, version.variant())?;

    Ok(DecodedSymbol {
        text,
        version,
        level,
        pattern,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode, EncodeOptions};

    fn grid_without_quiet_zone(qr: &crate::qr_code::QrCode, quiet: i32) -> (Vec<bool>, i32) {
        let n = qr.size - 2 * quiet;
        let mut out = vec![false; (n * n) as usize];
        for y in 0..n {
            for x in 0..n {
                out[(y * n + x) as usize] = qr.get_module(x + quiet, y + quiet);
            }
        }
        (out, n)
    }

    #[test]
    fn roundtrip_annex_i_example() {
        let opts = EncodeOptions {
            pattern: Some(Mask::new(2)),
            include_quiet_zone: false,
            byte_mode_encoding: "utf-8".to_string(),
        };
        let qr = encode("01234567", &[(Version::new(1), CodeEcc::Medium)], &opts).unwrap();
        let (grid, n) = grid_without_quiet_zone(&qr, 0);
        let decoded = decode_grid(&grid, n).unwrap();
        assert_eq!(decoded.text, "01234567");
        assert_eq!(decoded.version.value(), 1);
        assert_eq!(decoded.level, CodeEcc::Medium);
        assert_eq!(decoded.pattern.value(), 2);
    }

    #[test]
    fn roundtrip_auto_mask_and_version() {
        let opts = EncodeOptions {
            include_quiet_zone: false,
            ..EncodeOptions::default()
        };
        let payload = "The quick brown fox jumps over the lazy dog 0123456789";
        let qr = encode(
            payload,
            &[
                (Version::new(1), CodeEcc::Low),
                (Version::new(10), CodeEcc::Low),
            ],
            &opts,
        )
        .unwrap();
        let (grid, n) = grid_without_quiet_zone(&qr, 0);
        let decoded = decode_grid(&grid, n).unwrap();
        assert_eq!(decoded.text, payload);
    }

    #[test]
    fn rejects_bad_grid_size() {
        let grid = vec![false; 20 * 20];
        let err = decode_grid(&grid, 20).unwrap_err();
        assert!(matches!(err, QrError::DecoderFormat { .. }));
    }

    #[test]
    fn roundtrip_version_7_exercises_version_information_block() {
        // Version 7 is the smallest version that carries the Golay-coded
        // version information blocks (ISO/IEC 18004 §7.10), in addition to
        // the format information blocks every version carries.
        let opts = EncodeOptions {
            include_quiet_zone: false,
            ..EncodeOptions::default()
        };
        let payload = "Version 7 carries its own Golay-coded version block.";
        let qr = encode(payload, &[(Version::new(7), CodeEcc::Quartile)], &opts).unwrap();
        assert_eq!(qr.version.value(), 7);
        let (grid, n) = grid_without_quiet_zone(&qr, 0);
        let decoded = decode_grid(&grid, n).unwrap();
        assert_eq!(decoded.text, payload);
        assert_eq!(decoded.version.value(), 7);
        assert_eq!(decoded.level, CodeEcc::Quartile);
    }

    #[test]
    fn roundtrip_large_payload_near_version_40_capacity() {
        let opts = EncodeOptions {
            include_quiet_zone: false,
            ..EncodeOptions::default()
        };
        let mut payload = String::from("3.");
        payload.push_str(&"14159265358979323846264338327950288419716939937510".repeat(100));
        let qr = encode(&payload, &[(Version::new(40), CodeEcc::Low)], &opts).unwrap();
        let (grid, n) = grid_without_quiet_zone(&qr, 0);
        let decoded = decode_grid(&grid, n).unwrap();
        assert_eq!(decoded.text, payload);
    }
}
