//! Pareto-pruned dynamic-programming segmenter: finds the bit-minimal
//! sequence of mode segments encoding a payload string.

use crate::data_encoder::{alphanumeric_value_pub, numeric_value_pub};
use crate::kanji::kanji_character_value;
use crate::version::EncodingVariant;

/// One contiguous run of payload under a single encoding mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Numeric(String),
    Alphanumeric(String),
    Bytes(Vec<u8>),
    Kanji(String),
}

impl Segment {
    fn bitcount(&self, variant: EncodingVariant) -> usize {
        match self {
            Segment::Numeric(s) => {
                let n = s.chars().count();
                let count_bits = variant.numeric_count_bits() as usize;
                let extra = match n % 3 {
                    0 => (n / 3) * 10,
                    1 => (n / 3) * 10 + 4,
                    _ => (n / 3) * 10 + 7,
                };
                4 + count_bits + extra
            }
            Segment::Alphanumeric(s) => {
                let n = s.chars().count();
                let count_bits = variant.alphanumeric_count_bits() as usize;
                let extra = if n % 2 == 0 {
                    (n / 2) * 11
                } else {
                    (n / 2) * 11 + 6
                };
                4 + count_bits + extra
            }
            Segment::Bytes(b) => {
                let count_bits = variant.byte_count_bits() as usize;
                4 + count_bits + b.len() * 8
            }
            Segment::Kanji(s) => {
                let n = s.chars().count();
                let count_bits = variant.kanji_count_bits() as usize;
                4 + count_bits + n * 13
            }
        }
    }

    fn kind(&self) -> u8 {
        match self {
            Segment::Numeric(_) => 0,
            Segment::Alphanumeric(_) => 1,
            Segment::Bytes(_) => 2,
            Segment::Kanji(_) => 3,
        }
    }
}

#[derive(Clone, Debug)]
struct PartialSolution {
    segments: Vec<Segment>,
}

impl PartialSolution {
    fn active_kind(&self) -> Option<u8> {
        self.segments.last().map(Segment::kind)
    }

    fn bitcount(&self, variant: EncodingVariant) -> usize {
        self.segments.iter().map(|s| s.bitcount(variant)).sum()
    }

    fn better(&self, other: &PartialSolution, variant: EncodingVariant) -> bool {
        let (a, b) = (self.bitcount(variant), other.bitcount(variant));
        a < b || (a == b && self.segments.len() < other.segments.len())
    }

    fn extend_numeric(&self, c: char) -> PartialSolution {
        let mut segments = self.segments.clone();
        if self.active_kind() == Some(0) {
            if let Segment::Numeric(s) = segments.last_mut().unwrap() {
                s.push(c);
            }
        } else {
            segments.push(Segment::Numeric(c.to_string()));
        }
        PartialSolution { segments }
    }

    fn extend_alphanumeric(&self, c: char) -> PartialSolution {
        let mut segments = self.segments.clone();
        if self.active_kind() == Some(1) {
            if let Segment::Alphanumeric(s) = segments.last_mut().unwrap() {
                s.push(c);
            }
        } else {
            segments.push(Segment::Alphanumeric(c.to_string()));
        }
        PartialSolution { segments }
    }

    fn extend_bytes(&self, bytes: &[u8]) -> PartialSolution {
        let mut segments = self.segments.clone();
        if self.active_kind() == Some(2) {
            if let Segment::Bytes(b) = segments.last_mut().unwrap() {
                b.extend_from_slice(bytes);
            }
        } else {
            segments.push(Segment::Bytes(bytes.to_vec()));
        }
        PartialSolution { segments }
    }

    fn extend_kanji(&self, c: char) -> PartialSolution {
        let mut segments = self.segments.clone();
        if self.active_kind() == Some(3) {
            if let Segment::Kanji(s) = segments.last_mut().unwrap() {
                s.push(c);
            }
        } else {
            segments.push(Segment::Kanji(c.to_string()));
        }
        PartialSolution { segments }
    }
}

/// Encode a single character under `byte_mode_encoding` (`"utf-8"` or
/// `"iso-8859-1"`/a named `iso-8859-*` codepage); `None` if unrepresentable.
fn encode_byte_mode_char(c: char, byte_mode_encoding: &str) -> Option<Vec<u8>> {
    match byte_mode_encoding.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => {
            let mut buf = [0u8; 4];
            Some(c.encode_utf8(&mut buf).as_bytes().to_vec())
        }
        other => {
            let encoding = encoding_rs::Encoding::for_label(other.as_bytes())?;
            let mut s = String::new();
            s.push(c);
            let (cow, _, had_errors) = encoding.encode(&s);
            if had_errors {
                None
            } else {
                Some(cow.into_owned())
            }
        }
    }
}

/// Find all bit-count-optimal segmentations of `payload` for `variant`,
/// ordered best-first (minimum bit count, then minimum segment count).
/// Retains at most one partial solution per active-encoding tag at each
/// step, bounding memory at `O(4 * n)`; this never discards the global
/// optimum, only redundant same-bitcount alternatives within one active
/// encoding.
pub fn find_optimal_string_encoding(
    payload: &str,
    variant: EncodingVariant,
    byte_mode_encoding: &str,
) -> Vec<Segment> {
    let mut partials = vec![PartialSolution {
        segments: Vec::new(),
    }];

    for c in payload.chars() {
        let mut candidates = Vec::new();

        for p in &partials {
            if numeric_value_pub(c).is_some() {
                candidates.push(p.extend_numeric(c));
            }
            if alphanumeric_value_pub(c).is_some() {
                candidates.push(p.extend_alphanumeric(c));
            }
            if let Some(bytes) = encode_byte_mode_char(c, byte_mode_encoding) {
                candidates.push(p.extend_bytes(&bytes));
            }
            if kanji_character_value(c).is_ok() {
                candidates.push(p.extend_kanji(c));
            }
        }

        // Prune: discard any candidate strictly dominated by another with the
        // same active encoding, then keep at most one survivor per encoding.
        let mut best_by_kind: std::collections::BTreeMap<u8, PartialSolution> =
            std::collections::BTreeMap::new();
        for cand in candidates {
            let kind = cand.active_kind().unwrap();
            match best_by_kind.get(&kind) {
                Some(existing) if !cand.better(existing, variant) => {}
                _ => {
                    best_by_kind.insert(kind, cand);
                }
            }
        }
        partials = best_by_kind.into_values().collect();
    }

    // Final prune: drop anything not globally optimal (ignoring active encoding).
    let mut best: Option<PartialSolution> = None;
    for p in &partials {
        match &best {
            None => best = Some(p.clone()),
            Some(b) if p.better(b, variant) => best = Some(p.clone()),
            _ => {}
        }
    }

    best.map(|p| p.segments).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_digits_yield_single_numeric_segment() {
        let segs = find_optimal_string_encoding("0123456789", EncodingVariant::Small, "utf-8");
        assert_eq!(segs.len(), 1);
        assert!(matches!(&segs[0], Segment::Numeric(s) if s == "0123456789"));
    }

    #[test]
    fn numeric_bitcount_matches_grouping_formula() {
        let segs = find_optimal_string_encoding("123456789", EncodingVariant::Small, "utf-8");
        let variant = EncodingVariant::Small;
        let total: usize = segs.iter().map(|s| s.bitcount(variant)).sum();
        // n=9: 4 + 10 + 3*10 = 44
        assert_eq!(total, 4 + 10 + 30);
    }

    #[test]
    fn mixed_alnum_then_bytes_switches_mode() {
        let segs = find_optimal_string_encoding("ABC123!!!lower", EncodingVariant::Small, "utf-8");
        assert!(segs.len() >= 2);
    }

    #[test]
    fn iso8859_1_never_exceeds_single_byte_segment() {
        let payload = "Hello, world!";
        let segs = find_optimal_string_encoding(payload, EncodingVariant::Small, "iso-8859-1");
        let variant = EncodingVariant::Small;
        let total: usize = segs.iter().map(|s| s.bitcount(variant)).sum();
        let single_byte_segment_bits = 4 + variant.byte_count_bits() as usize + payload.len() * 8;
        assert!(total <= single_byte_segment_bits);
    }

    #[test]
    fn kanji_characters_use_kanji_mode() {
        let segs = find_optimal_string_encoding("点茗", EncodingVariant::Small, "utf-8");
        assert_eq!(segs.len(), 1);
        assert!(matches!(&segs[0], Segment::Kanji(s) if s == "点茗"));
    }

    #[test]
    fn leading_alnum_prefix_then_long_numeric_run_splits_in_two() {
        // Mirrors the "pi digits" shape from the spec's worked scenarios: a short
        // alphanumeric prefix (digits are cheaper in numeric mode, so "3." can't
        // merge into the numeric run) followed by a long run of decimal digits.
        let mut payload = String::from("3.");
        payload.push_str(&"1".repeat(500));
        let segs = find_optimal_string_encoding(&payload, EncodingVariant::Large, "utf-8");
        assert_eq!(segs.len(), 2);
        assert!(matches!(&segs[0], Segment::Alphanumeric(s) if s == "3."));
        assert!(matches!(&segs[1], Segment::Numeric(s) if s.len() == 500));
    }
}
