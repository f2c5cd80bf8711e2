//! Reed-Solomon syndrome decoding for one received block: syndrome
//! computation, Peterson-Gorenstein-Zierler error-locator construction
//! (direct `Lambda(x)` form solved by Gaussian elimination), exhaustive root
//! search for error positions, and a Vandermonde solve for error magnitudes.

use crate::gf256::Gf256;
use crate::QrError;

/// Solves the square linear system `matrix * x = rhs` over GF(256) by
/// Gaussian elimination with partial pivoting. `None` if singular.
fn gauss_solve(mut matrix: Vec<Vec<Gf256>>, mut rhs: Vec<Gf256>) -> Option<Vec<Gf256>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot_row = (col..n).find(|&r| matrix[r][col] != Gf256::ZERO)?;
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        let pivot_inv = matrix[col][col].inverse().ok()?;
        for c in col..n {
            matrix[col][c] = matrix[col][c].mul(pivot_inv);
        }
        rhs[col] = rhs[col].mul(pivot_inv);

        for r in 0..n {
            if r == col || matrix[r][col] == Gf256::ZERO {
                continue;
            }
            let factor = matrix[r][col];
            for c in col..n {
                matrix[r][c] = matrix[r][c] - matrix[col][c].mul(factor);
            }
            rhs[r] = rhs[r] - rhs[col].mul(factor);
        }
    }
    Some(rhs)
}

/// Syndromes `S_j = R(alpha^j)` for `j = 0..num_syndromes-1`, where `R` is
/// the received-block polynomial (coefficient of `x^(len-1-idx)` is
/// `received[idx]`, matching the encoder's codeword convention).
fn syndromes(received: &[u8], num_syndromes: usize) -> Vec<Gf256> {
    let coeffs: Vec<Gf256> = received.iter().rev().map(|&b| Gf256::new(b)).collect();
    (0..num_syndromes)
        .map(|j| {
            let x = Gf256::alpha_pow(j as i32);
            let mut acc = Gf256::ZERO;
            for &c in coeffs.iter().rev() {
                acc = acc.mul(x) + c;
            }
            acc
        })
        .collect()
}

/// Attempts to build and solve the error-locator system for exactly `v`
/// errors. Returns `Lambda_1..Lambda_v` (the coefficients of `Lambda(x) = 1 +
/// sum Lambda_j x^j`) or `None` if the system is singular.
fn solve_locator(syndromes: &[Gf256], v: usize) -> Option<Vec<Gf256>> {
    let mut matrix = vec![vec![Gf256::ZERO; v]; v];
    let mut rhs = vec![Gf256::ZERO; v];
    for t in 0..v {
        for c in 0..v {
            matrix[t][c] = syndromes[t + v - 1 - c];
        }
        rhs[t] = syndromes[t + v];
    }
    gauss_solve(matrix, rhs)
}

/// Exhaustively searches `x = alpha^0 .. alpha^254` for roots of
/// `Lambda(x) = 1 + sum Lambda_j x^j`, returning their degree-space error
/// positions `i_l` (such that `x = alpha^{-i_l}`), ascending.
fn find_error_positions(lambda: &[Gf256], block_len: usize) -> Option<Vec<usize>> {
    let v = lambda.len();
    let mut positions = Vec::new();
    for log_x in 0..255i32 {
        let x = Gf256::alpha_pow(log_x);
        let mut value = Gf256::ONE;
        let mut xp = x;
        for &l in lambda {
            value = value + l.mul(xp);
            xp = xp.mul(x);
        }
        if value == Gf256::ZERO {
            let i_l = ((255 - log_x) % 255) as usize;
            if i_l < block_len {
                positions.push(i_l);
            }
        }
    }
    if positions.len() == v {
        positions.sort_unstable();
        Some(positions)
    } else {
        None
    }
}

/// Solves the Vandermonde system `sum_j e_j * alpha^{p_j*k} = S_k` (`k =
/// 0..v-1`) for the error magnitudes at positions `p_j`.
fn find_error_magnitudes(syndromes: &[Gf256], positions: &[usize]) -> Option<Vec<Gf256>> {
    let v = positions.len();
    let mut matrix = vec![vec![Gf256::ZERO; v]; v];
    let mut rhs = vec![Gf256::ZERO; v];
    for k in 0..v {
        for (j, &p) in positions.iter().enumerate() {
            matrix[k][j] = Gf256::alpha_pow((p as i32) * (k as i32));
        }
        rhs[k] = syndromes[k];
    }
    gauss_solve(matrix, rhs)
}

/// Corrects `received` (length `c = k + r`) in place, assuming at most
/// `floor(r/2)` errors. Returns the number of errors corrected, or
/// `QrError::DecoderRs` if no consistent correction exists.
///
/// After a candidate correction is found, syndromes are recomputed from the
/// corrected word and checked to be all-zero before accepting it — a
/// codeword that merely satisfies the locator system is not trusted blindly.
pub fn rs_decode_block(
    received: &mut [u8],
    r: usize,
    block_index: usize,
) -> Result<usize, QrError> {
    let initial = syndromes(received, r);
    if initial.iter().all(|&s| s == Gf256::ZERO) {
        return Ok(0);
    }

    let max_errors = r / 2;
    let mut v = max_errors;
    while v >= 1 {
        if r >= 2 * v {
            if let Some(lambda) = solve_locator(&initial, v) {
                if let Some(positions) = find_error_positions(&lambda, received.len()) {
                    if let Some(magnitudes) = find_error_magnitudes(&initial, &positions) {
                        let mut candidate = received.to_vec();
                        for (&pos, &mag) in positions.iter().zip(magnitudes.iter()) {
                            let idx = candidate.len() - 1 - pos;
                            candidate[idx] ^= mag.value();
                        }
                        if syndromes(&candidate, r).iter().all(|&s| s == Gf256::ZERO) {
                            received.copy_from_slice(&candidate);
                            return Ok(v);
                        }
                    }
                }
            }
        }
        v -= 1;
    }

    Err(QrError::DecoderRs {
        block_index,
        errors_attempted: max_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rs_encoder::rs_encode_block;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn make_codeword(data: &[u8], r: usize) -> Vec<u8> {
        let ec = rs_encode_block(data, r);
        let mut word = data.to_vec();
        word.extend(ec);
        word
    }

    #[test]
    fn decodes_clean_codeword() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let mut word = make_codeword(&data, 10);
        let corrected = rs_decode_block(&mut word, 10, 0).unwrap();
        assert_eq!(corrected, 0);
        assert_eq!(&word[..16], &data[..]);
    }

    #[test]
    fn corrects_up_to_floor_r_over_2_random_errors() {
        let mut rng = StdRng::seed_from_u64(42);
        for _trial in 0..200 {
            let k = 16;
            let r = 10;
            let data: Vec<u8> = (0..k).map(|_| rng.gen::<u8>()).collect();
            let original = make_codeword(&data, r);
            let max_errors = r / 2;
            let num_errors = rng.gen_range(0..=max_errors);

            let mut corrupted = original.clone();
            let mut positions: Vec<usize> = (0..original.len()).collect();
            for i in (1..positions.len()).rev() {
                let j = rng.gen_range(0..=i);
                positions.swap(i, j);
            }
            for &pos in positions.iter().take(num_errors) {
                let mut delta = rng.gen::<u8>();
                while delta == 0 {
                    delta = rng.gen::<u8>();
                }
                corrupted[pos] ^= delta;
            }

            let corrected = rs_decode_block(&mut corrupted, r, 0).unwrap();
            assert_eq!(corrected, num_errors);
            assert_eq!(corrupted, original);
        }
    }

    #[test]
    fn excessive_errors_either_recover_or_fail_never_silently_wrong() {
        let mut rng = StdRng::seed_from_u64(7);
        let k = 16;
        let r = 10;
        let data: Vec<u8> = (0..k).map(|_| rng.gen::<u8>()).collect();
        let original = make_codeword(&data, r);

        for _trial in 0..50 {
            let mut corrupted = original.clone();
            let mut positions: Vec<usize> = (0..original.len()).collect();
            for i in (1..positions.len()).rev() {
                let j = rng.gen_range(0..=i);
                positions.swap(i, j);
            }
            let num_errors = r / 2 + 2;
            for &pos in positions.iter().take(num_errors) {
                let mut delta = rng.gen::<u8>();
                while delta == 0 {
                    delta = rng.gen::<u8>();
                }
                corrupted[pos] ^= delta;
            }
            match rs_decode_block(&mut corrupted, r, 0) {
                Ok(_) => assert_eq!(corrupted, original),
                Err(_) => {}
            }
        }
    }
}
