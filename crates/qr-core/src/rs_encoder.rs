//! Reed-Solomon encoding of data codewords into per-block EC codewords, and
//! the block interleaving that produces the final raw codeword stream.

use crate::gf256::Gf256;
use crate::polynomial::Gf256Polynomial;
use crate::version::VersionSpec;

/// Computes the `r` error-correction codewords for one block of `k` data
/// codewords, via the generator `g_r(x)` stripped of its leading 1.
pub fn rs_encode_block(data: &[u8], r: usize) -> Vec<u8> {
    let generator = Gf256Polynomial::reed_solomon_generator(r);

    // data codewords are coefficients highest-degree-first; store low-degree-first.
    let data_poly = Gf256Polynomial::new(data.iter().rev().map(|&b| Gf256::new(b)).collect());
    let shifted = data_poly.shl(r);
    let remainder = shifted.rem(&generator);

    // remainder has degree < r; emit r codewords, highest-degree-first (= "first" EC byte).
    (0..r).rev().map(|i| remainder.coeff(i).value()).collect()
}

/// One block's data codewords followed by its EC codewords.
pub struct EncodedBlock {
    pub data: Vec<u8>,
    pub ec: Vec<u8>,
}

/// Splits `data` into the blocks named by `spec`'s groups, computes each
/// block's EC codewords, and interleaves per ISO/IEC 18004 §8.6: round-robin
/// one data codeword per block (skipping exhausted blocks), then the same
/// for EC.
pub fn rs_encode_and_interleave(spec: &VersionSpec, data: &[u8]) -> Vec<u8> {
    assert_eq!(data.len(), spec.data_codewords());

    let mut blocks: Vec<EncodedBlock> = Vec::with_capacity(spec.num_blocks());
    let mut offset = 0;
    for group in &spec.groups {
        for _ in 0..group.count {
            let block_data = data[offset..offset + group.data_len].to_vec();
            offset += group.data_len;
            let ec = rs_encode_block(&block_data, spec.ec_codewords_per_block);
            blocks.push(EncodedBlock {
                data: block_data,
                ec,
            });
        }
    }

    let max_data_len = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
    let mut result = Vec::with_capacity(spec.total_codewords);
    for i in 0..max_data_len {
        for block in &blocks {
            if i < block.data.len() {
                result.push(block.data[i]);
            }
        }
    }
    for i in 0..spec.ec_codewords_per_block {
        for block in &blocks {
            result.push(block.ec[i]);
        }
    }
    result
}

/// Inverse of [`rs_encode_and_interleave`]'s interleaving step: splits a raw
/// (still block-interleaved) codeword stream back into per-block `data ++
/// ec` byte vectors, in block order.
pub fn rs_deinterleave(spec: &VersionSpec, raw: &[u8]) -> Vec<Vec<u8>> {
    let data_lens: Vec<usize> = spec
        .groups
        .iter()
        .flat_map(|g| std::iter::repeat_n(g.data_len, g.count))
        .collect();
    let num_blocks = data_lens.len();
    let max_data_len = data_lens.iter().copied().max().unwrap_or(0);
    let r = spec.ec_codewords_per_block;

    let mut blocks: Vec<Vec<u8>> = data_lens
        .iter()
        .map(|&n| Vec::with_capacity(n + r))
        .collect();

    let mut pos = 0;
    for i in 0..max_data_len {
        for (b, &len) in data_lens.iter().enumerate() {
            if i < len {
                blocks[b].push(raw[pos]);
                pos += 1;
            }
        }
    }
    for _ in 0..r {
        for b in 0..num_blocks {
            blocks[b].push(raw[pos]);
            pos += 1;
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_ecc::CodeEcc;
    use crate::polynomial::Gf256Polynomial as Poly;
    use crate::version::Version;

    #[test]
    fn rs_remainder_of_codeword_is_zero() {
        let data: Vec<u8> = vec![
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        let ec = rs_encode_block(&data, 10);
        assert_eq!(
            ec,
            vec![0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]
        );

        let mut codeword: Vec<Gf256> = data
            .iter()
            .chain(ec.iter())
            .rev()
            .map(|&b| Gf256::new(b))
            .collect();
        codeword.reverse();
        let poly = Poly::new(codeword.into_iter().rev().collect());
        let generator = Poly::reed_solomon_generator(10);
        assert!(poly.rem(&generator).is_zero());
    }

    #[test]
    fn annex_i_interleave_matches_reference() {
        let spec = VersionSpec::for_version_level(Version::new(1), CodeEcc::Medium);
        let data: Vec<u8> = vec![
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        let out = rs_encode_and_interleave(&spec, &data);
        assert_eq!(
            out,
            vec![
                0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
                0xEC, 0x11, 0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55,
            ]
        );
    }
}
