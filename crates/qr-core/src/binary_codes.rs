//! BCH(15,5) format-information and Golay(18,6) version-information remainders.
//!
//! Both use the same shift-register remainder algorithm: scan the data
//! MSB-first, shifting a residual register and conditionally XOR-ing in the
//! generator whenever the fed-out bit disagrees with the incoming data bit.

const FORMAT_GENERATOR: u32 = 0b10100110111; // 11 bits, degree 10
const FORMAT_MASK: u32 = 0x5412; // applied to the 15-bit (data<<10 | remainder) field
const VERSION_GENERATOR: u32 = 0b1111100100101; // 13 bits, degree 12

fn shift_register_remainder(
    data: u32,
    data_bits: u32,
    generator: u32,
    generator_degree: u32,
) -> u32 {
    let mut residual = data << generator_degree;
    for i in (generator_degree..(data_bits + generator_degree)).rev() {
        if (residual >> i) & 1 != 0 {
            residual ^= generator << (i - generator_degree);
        }
    }
    residual & ((1 << generator_degree) - 1)
}

/// 10-bit BCH remainder of a 5-bit format data value.
pub fn format_remainder(data: u32) -> u32 {
    debug_assert!(data < 32);
    shift_register_remainder(data, 5, FORMAT_GENERATOR, 10)
}

/// Full 15-bit format field: BCH-protected and XOR-masked, ready to write to the grid.
pub fn format_code(data: u32) -> u32 {
    let field = (data << 10) | format_remainder(data);
    field ^ FORMAT_MASK
}

/// 12-bit Golay remainder of a 6-bit version data value.
pub fn version_remainder(version: u32) -> u32 {
    debug_assert!(version < 64);
    shift_register_remainder(version, 6, VERSION_GENERATOR, 12)
}

/// Full 18-bit version field: Golay-protected, no post-XOR.
pub fn version_code(version: u32) -> u32 {
    (version << 12) | version_remainder(version)
}

/// Number of bits set in `a ^ b`.
pub fn hamming_distance(a: u32, b: u32) -> u32 {
    (a ^ b).count_ones()
}

/// Recover the 5-bit format data nearest (by Hamming distance) to `received`
/// among all 32 valid 15-bit format codewords. Returns `None` if the minimum
/// distance is not uniquely attained.
pub fn correct_format_code(received: u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None; // (distance, data)
    let mut ties = 0;
    for data in 0..32u32 {
        let code = format_code(data);
        let dist = hamming_distance(code, received);
        match best {
            None => {
                best = Some((dist, data));
                ties = 1;
            }
            Some((bd, _)) if dist < bd => {
                best = Some((dist, data));
                ties = 1;
            }
            Some((bd, _)) if dist == bd => {
                ties += 1;
            }
            _ => {}
        }
    }
    match best {
        Some((_, data)) if ties == 1 => Some(data),
        _ => None,
    }
}

/// Recover the 6-bit version data nearest (by Hamming distance) to `received`
/// among all 40 valid 18-bit version codewords (versions 7..=40). `None` if
/// not uniquely attained.
pub fn correct_version_code(received: u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None;
    let mut ties = 0;
    for version in 7..=40u32 {
        let code = version_code(version);
        let dist = hamming_distance(code, received);
        match best {
            None => {
                best = Some((dist, version));
                ties = 1;
            }
            Some((bd, _)) if dist < bd => {
                best = Some((dist, version));
                ties = 1;
            }
            Some((bd, _)) if dist == bd => {
                ties += 1;
            }
            _ => {}
        }
    }
    match best {
        Some((_, version)) if ties == 1 => Some(version),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Table C.1 samples (ISO/IEC 18004), format data value -> 15-bit code.
    #[test]
    fn format_code_table_samples() {
        assert_eq!(format_code(0b00000), 0b101010000010010);
        assert_eq!(format_code(0b01111), 0b110100101110110);
    }

    #[test]
    fn format_remainder_is_deterministic_and_in_range() {
        for data in 0..32 {
            let r = format_remainder(data);
            assert!(r < 1024);
        }
    }

    #[test]
    fn version_code_table_sample() {
        // Version 7, Table D.1.
        assert_eq!(version_code(7), 0b000111110010010100);
    }

    #[test]
    fn correct_format_code_no_errors() {
        for data in 0..32 {
            assert_eq!(correct_format_code(format_code(data)), Some(data));
        }
    }

    #[test]
    fn correct_format_code_one_bit_error() {
        for data in 0..32 {
            let code = format_code(data);
            for bit in 0..15 {
                let corrupted = code ^ (1 << bit);
                assert_eq!(correct_format_code(corrupted), Some(data));
            }
        }
    }

    #[test]
    fn correct_version_code_no_errors() {
        for version in 7..=40 {
            assert_eq!(correct_version_code(version_code(version)), Some(version));
        }
    }
}
