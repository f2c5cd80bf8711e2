/// A number between 1 and 40 (inclusive).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// Panics if the number is outside the range [1, 40].
    pub fn new(ver: u8) -> Self {
        assert!(
            (Version::MIN.value()..=Version::MAX.value()).contains(&ver),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub fn value(self) -> u8 {
        self.0
    }

    /// Fallible counterpart of [`Version::new`], for caller-supplied input.
    pub fn try_new(ver: u32) -> crate::QrResult<Self> {
        if (Version::MIN.value() as u32..=Version::MAX.value() as u32).contains(&ver) {
            Ok(Self(ver as u8))
        } else {
            Err(crate::QrError::precondition(format!(
                "version {} out of range [1,40]",
                ver
            )))
        }
    }

    /// Symbol side length in modules, excluding any quiet zone: `17 + 4v`.
    pub fn size(self) -> i32 {
        17 + 4 * self.0 as i32
    }

    /// From a measured grid side length, excluding quiet zone. `None` if not `17 + 4v`
    /// for some `v` in `[1, 40]`.
    pub fn from_size(size: i32) -> Option<Self> {
        if (size - 17) % 4 != 0 {
            return None;
        }
        let v = (size - 17) / 4;
        if (1..=40).contains(&v) {
            Some(Version(v as u8))
        } else {
            None
        }
    }

    pub fn variant(self) -> EncodingVariant {
        EncodingVariant::from_version(self)
    }
}

/// Groups versions by the count-bit widths their segments use.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EncodingVariant {
    Small,  // versions 1..9
    Medium, // versions 10..26
    Large,  // versions 27..40
}

impl EncodingVariant {
    pub fn from_version(version: Version) -> Self {
        match version.value() {
            1..=9 => EncodingVariant::Small,
            10..=26 => EncodingVariant::Medium,
            _ => EncodingVariant::Large,
        }
    }

    pub fn numeric_count_bits(self) -> u32 {
        match self {
            EncodingVariant::Small => 10,
            EncodingVariant::Medium => 12,
            EncodingVariant::Large => 14,
        }
    }

    pub fn alphanumeric_count_bits(self) -> u32 {
        match self {
            EncodingVariant::Small => 9,
            EncodingVariant::Medium => 11,
            EncodingVariant::Large => 13,
        }
    }

    pub fn byte_count_bits(self) -> u32 {
        match self {
            EncodingVariant::Small => 8,
            EncodingVariant::Medium => 16,
            EncodingVariant::Large => 16,
        }
    }

    pub fn kanji_count_bits(self) -> u32 {
        match self {
            EncodingVariant::Small => 8,
            EncodingVariant::Medium => 10,
            EncodingVariant::Large => 12,
        }
    }
}

/// Number of data+EC module positions available for a given version, per
/// ISO/IEC 18004 (accounts for the missing alignment pattern at v=1 and the
/// missing version-information blocks for v<=6).
pub fn raw_data_modules(version: Version) -> i32 {
    let v = version.value() as i32;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let numalign = v / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// One block group within a [`VersionSpec`]: `count` blocks, each with total
/// length `c` codewords, `k` of which are data (the remaining `c - k` are EC).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockGroup {
    pub count: usize,
    pub total_len: usize,
    pub data_len: usize,
}

/// Per-(version, level) codeword layout: total codewords, EC codewords per
/// block, and the block groups. Derived from the standard's
/// `ECC_CODEWORDS_PER_BLOCK` / `NUM_ERROR_CORRECTION_BLOCKS` tables and the
/// raw-module-capacity formula, rather than transcribed from Table 9 by hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionSpec {
    pub version: Version,
    pub level: crate::CodeEcc,
    pub total_codewords: usize,
    pub ec_codewords_per_block: usize,
    pub groups: Vec<BlockGroup>,
}

impl VersionSpec {
    pub fn for_version_level(version: Version, level: crate::CodeEcc) -> VersionSpec {
        let v = version.value() as usize;
        let ord = level.ordinal();
        let total_codewords = (raw_data_modules(version) / 8) as usize;
        let ec_per_block = crate::ECC_CODEWORDS_PER_BLOCK[ord][v] as usize;
        let num_blocks = crate::NUM_ERROR_CORRECTION_BLOCKS[ord][v] as usize;

        let raw_codewords = total_codewords;
        let num_short_blocks = num_blocks - raw_codewords % num_blocks;
        let short_block_len = raw_codewords / num_blocks;

        let mut groups = Vec::new();
        if num_short_blocks > 0 {
            groups.push(BlockGroup {
                count: num_short_blocks,
                total_len: short_block_len,
                data_len: short_block_len - ec_per_block,
            });
        }
        if num_blocks - num_short_blocks > 0 {
            groups.push(BlockGroup {
                count: num_blocks - num_short_blocks,
                total_len: short_block_len + 1,
                data_len: short_block_len + 1 - ec_per_block,
            });
        }

        VersionSpec {
            version,
            level,
            total_codewords,
            ec_codewords_per_block: ec_per_block,
            groups,
        }
    }

    pub fn data_codewords(&self) -> usize {
        self.groups.iter().map(|g| g.count * g.data_len).sum()
    }

    pub fn num_blocks(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodeEcc;

    #[test]
    fn raw_data_modules_annex_i_v1() {
        // Version 1: capacity 208 bits = 26 codewords.
        assert_eq!(raw_data_modules(Version::new(1)), 208);
    }

    #[test]
    fn version_spec_invariants_all_versions_levels() {
        for v in 1..=40u8 {
            let version = Version::new(v);
            for level in [
                CodeEcc::Low,
                CodeEcc::Medium,
                CodeEcc::Quartile,
                CodeEcc::High,
            ] {
                let spec = VersionSpec::for_version_level(version, level);
                let sum_c: usize = spec.groups.iter().map(|g| g.count * g.total_len).sum();
                assert_eq!(sum_c, spec.total_codewords, "v={} level={:?}", v, level);
                let sum_k: usize = spec.groups.iter().map(|g| g.count * g.data_len).sum();
                assert_eq!(sum_k, spec.data_codewords());
                let rs: Vec<usize> = spec
                    .groups
                    .iter()
                    .map(|g| g.total_len - g.data_len)
                    .collect();
                assert!(
                    rs.windows(2).all(|w| w[0] == w[1]),
                    "unequal r across groups"
                );
            }
        }
    }

    #[test]
    fn capacity_mod_eight_in_expected_set() {
        for v in 1..=40u8 {
            let capacity = raw_data_modules(Version::new(v));
            assert!([0, 3, 4, 7].contains(&(capacity % 8)));
        }
    }

    #[test]
    fn version_size_roundtrip() {
        for v in 1..=40u8 {
            let version = Version::new(v);
            assert_eq!(Version::from_size(version.size()), Some(version));
        }
    }
}
