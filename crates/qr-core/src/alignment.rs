//! Alignment-pattern center positions per version (ISO/IEC 18004 Table E.1).

use crate::version::Version;

/// Ascending list of alignment-pattern center coordinates for `version`, used
/// on both the x and y axes. Empty for version 1 (no alignment patterns).
pub fn alignment_pattern_positions(version: Version) -> Vec<i32> {
    let ver = i32::from(version.value());
    if ver == 1 {
        return vec![];
    }
    let size = version.size();
    let numalign = ver / 7 + 2;
    let step = if ver == 32 {
        26
    } else {
        (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
    };
    let mut result: Vec<i32> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_1_has_no_alignment_patterns() {
        assert!(alignment_pattern_positions(Version::new(1)).is_empty());
    }

    #[test]
    fn version_2_matches_table_e1() {
        assert_eq!(alignment_pattern_positions(Version::new(2)), vec![6, 18]);
    }

    #[test]
    fn version_7_matches_table_e1() {
        assert_eq!(
            alignment_pattern_positions(Version::new(7)),
            vec![6, 22, 38]
        );
    }

    #[test]
    fn version_32_matches_table_e1() {
        assert_eq!(
            alignment_pattern_positions(Version::new(32)),
            vec![6, 34, 60, 86, 112, 138]
        );
    }
}
