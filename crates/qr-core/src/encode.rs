//! Top-level encode entry point: picks the first `(version, level)`
//! preference whose capacity fits the optimal segmentation of the payload,
//! assembles codewords, lays out the canvas, selects a mask, and freezes a
//! module grid.

use std::collections::HashMap;

use crate::canvas::Canvas;
use crate::code_ecc::CodeEcc;
use crate::data_encoder::DataEncoder;
use crate::mask::Mask;
use crate::qr_code::QrCode;
use crate::rs_encoder::rs_encode_and_interleave;
use crate::segmenter::{find_optimal_string_encoding, Segment};
use crate::version::{EncodingVariant, Version, VersionSpec};
use crate::{QrError, QrResult};

/// Encode-time options beyond payload and version/level preferences.
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    pub pattern: Option<Mask>,
    pub include_quiet_zone: bool,
    pub byte_mode_encoding: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            pattern: None,
            include_quiet_zone: true,
            byte_mode_encoding: "utf-8".to_string(),
        }
    }
}

fn segments_to_codewords(
    segments: &[Segment],
    variant: EncodingVariant,
    data_codewords: usize,
) -> QrResult<Vec<u8>> {
    let mut encoder = DataEncoder::new(variant);
    for seg in segments {
        match seg {
            Segment::Numeric(s) => encoder.append_numeric(s)?,
            Segment::Alphanumeric(s) => encoder.append_alphanumeric(s)?,
            Segment::Bytes(b) => encoder.append_bytes(b)?,
            Segment::Kanji(s) => encoder.append_kanji(s)?,
        }
    }
    encoder
        .to_codewords(data_codewords)
        .ok_or_else(|| QrError::Capacity {
            bit_length: data_codewords * 8 + 1,
        })
}

/// Encodes `payload` into a module grid, trying each `(version, level)` in
/// `preferences` in order and accepting the first that fits. Segmentations
/// are cached per `EncodingVariant` since several versions share one.
pub fn encode(
    payload: &str,
    preferences: &[(Version, CodeEcc)],
    options: &EncodeOptions,
) -> QrResult<QrCode> {
    if preferences.is_empty() {
        return Err(QrError::precondition(
            "no (version, level) preferences supplied",
        ));
    }

    let mut segment_cache: HashMap<u8, Vec<Segment>> = HashMap::new();
    let variant_key = |v: EncodingVariant| match v {
        EncodingVariant::Small => 0u8,
        EncodingVariant::Medium => 1u8,
        EncodingVariant::Large => 2u8,
    };

    for &(version, level) in preferences {
        let variant = version.variant();
        let key = variant_key(variant);
        let segments = segment_cache.entry(key).or_insert_with(|| {
            find_optimal_string_encoding(payload, variant, &options.byte_mode_encoding)
        });

        let spec = VersionSpec::for_version_level(version, level);
        let data_codewords = spec.data_codewords();

        let bit_count: usize = segments_bit_count(segments, variant);
        if bit_count > data_codewords * 8 {
            continue;
        }

        let codewords = match segments_to_codewords(segments, variant, data_codewords) {
            Ok(c) => c,
            Err(_) => continue,
        };

        log::info!(
            "qr-core: encoding {} bits into version {} level {:?}",
            bit_count,
            version.value(),
            level
        );

        return Ok(build_symbol(version, level, &spec, &codewords, options));
    }

    let variant = preferences[0].0.variant();
    let bits = segment_cache
        .get(&variant_key(variant))
        .map(|s| segments_bit_count(s, variant))
        .unwrap_or(0);
    Err(QrError::Capacity { bit_length: bits })
}

fn segments_bit_count(segments: &[Segment], variant: EncodingVariant) -> usize {
    // Mirrors DataEncoder's header/count/payload accounting for the raw
    // segment bits, with no terminator added: `to_codewords` only rejects a
    // payload when the raw bits themselves overflow capacity, since the
    // terminator is truncatable (or omittable) when room is short.
    let mut encoder = DataEncoder::new(variant);
    for seg in segments {
        let _ = match seg {
            Segment::Numeric(s) => encoder.append_numeric(s),
            Segment::Alphanumeric(s) => encoder.append_alphanumeric(s),
            Segment::Bytes(b) => encoder.append_bytes(b),
            Segment::Kanji(s) => encoder.append_kanji(s),
        };
    }
    encoder.bit_len()
}

fn build_symbol(
    version: Version,
    level: CodeEcc,
    spec: &VersionSpec,
    data_codewords: &[u8],
    options: &EncodeOptions,
) -> QrCode {
    let mut canvas = Canvas::new(version);
    canvas.build_function_patterns();

    let interleaved = rs_encode_and_interleave(spec, data_codewords);
    canvas.place_codewords(&interleaved, data_codewords.len());

    let pattern = match options.pattern {
        Some(m) => m,
        None => {
            let mut best_mask = Mask::new(0);
            let mut best_penalty = i32::MAX;
            for i in 0..8u8 {
                let m = Mask::new(i);
                canvas.apply_mask(m);
                canvas.draw_format_bits(m, level);
                let penalty = canvas.penalty_score();
                canvas.apply_mask(m); // undo
                if penalty < best_penalty {
                    best_penalty = penalty;
                    best_mask = m;
                }
            }
            log::info!(
                "qr-core: mask {} selected (penalty {})",
                best_mask.value(),
                best_penalty
            );
            best_mask
        }
    };

    canvas.apply_mask(pattern);
    canvas.draw_format_bits(pattern, level);

    let quiet = if options.include_quiet_zone { 4 } else { 0 };
    let (size, modules) = canvas.freeze(quiet);

    QrCode {
        version,
        level,
        pattern,
        size,
        modules,
    }
}
