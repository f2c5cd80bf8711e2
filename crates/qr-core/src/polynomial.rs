//! Polynomials over GF(256), coefficients stored low-degree-first.

use crate::gf256::Gf256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gf256Polynomial {
    /// `coeffs[i]` is the coefficient of `x^i`. Trailing (high-degree) zero
    /// coefficients are stripped, except a lone `[0]` is kept for the zero
    /// polynomial.
    coeffs: Vec<Gf256>,
}

impl Gf256Polynomial {
    pub fn new(coeffs: Vec<Gf256>) -> Self {
        let mut p = Gf256Polynomial { coeffs };
        p.strip();
        p
    }

    pub fn zero() -> Self {
        Gf256Polynomial {
            coeffs: vec![Gf256::ZERO],
        }
    }

    pub fn one() -> Self {
        Gf256Polynomial {
            coeffs: vec![Gf256::ONE],
        }
    }

    fn strip(&mut self) {
        while self.coeffs.len() > 1 && *self.coeffs.last().unwrap() == Gf256::ZERO {
            self.coeffs.pop();
        }
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeffs(&self) -> &[Gf256] {
        &self.coeffs
    }

    pub fn coeff(&self, i: usize) -> Gf256 {
        self.coeffs.get(i).copied().unwrap_or(Gf256::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0] == Gf256::ZERO
    }

    pub fn add(&self, rhs: &Gf256Polynomial) -> Gf256Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let mut out = vec![Gf256::ZERO; n];
        for i in 0..n {
            out[i] = self.coeff(i) + rhs.coeff(i);
        }
        Gf256Polynomial::new(out)
    }

    pub fn scalar_mul(&self, k: Gf256) -> Gf256Polynomial {
        Gf256Polynomial::new(self.coeffs.iter().map(|&c| c.mul(k)).collect())
    }

    pub fn mul(&self, rhs: &Gf256Polynomial) -> Gf256Polynomial {
        let mut out = vec![Gf256::ZERO; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (ia, &a) in self.coeffs.iter().enumerate() {
            if a == Gf256::ZERO {
                continue;
            }
            for (ib, &b) in rhs.coeffs.iter().enumerate() {
                out[ia + ib] = out[ia + ib] + a.mul(b);
            }
        }
        Gf256Polynomial::new(out)
    }

    /// Prepend `k` zero coefficients, i.e. multiply by `x^k`.
    pub fn shl(&self, k: usize) -> Gf256Polynomial {
        let mut out = vec![Gf256::ZERO; k];
        out.extend_from_slice(&self.coeffs);
        Gf256Polynomial::new(out)
    }

    /// Remainder of `self` modulo `divisor`, classical long division.
    /// `divisor` must be monic (leading, i.e. highest-degree, coefficient == 1).
    pub fn rem(&self, divisor: &Gf256Polynomial) -> Gf256Polynomial {
        assert_eq!(
            *divisor.coeffs.last().unwrap(),
            Gf256::ONE,
            "divisor must be monic"
        );
        let mut remainder = self.coeffs.clone();
        let dd = divisor.degree();
        while remainder.len() > 1 && remainder.len() - 1 >= dd {
            let lead = *remainder.last().unwrap();
            if lead != Gf256::ZERO {
                let shift = remainder.len() - 1 - dd;
                for (i, &c) in divisor.coeffs.iter().enumerate() {
                    remainder[shift + i] = remainder[shift + i] - c.mul(lead);
                }
            }
            remainder.pop();
        }
        Gf256Polynomial::new(remainder)
    }

    /// Evaluate via Horner's method (high-degree-first).
    pub fn evaluate(&self, x: Gf256) -> Gf256 {
        let mut result = Gf256::ZERO;
        for &c in self.coeffs.iter().rev() {
            result = result.mul(x) + c;
        }
        result
    }

    /// The Reed-Solomon generator polynomial `g_n(x) = prod_{k=0}^{n-1} (x - alpha^k)`.
    pub fn reed_solomon_generator(n: usize) -> Gf256Polynomial {
        let mut poly = Gf256Polynomial::one();
        for k in 0..n {
            let factor = Gf256Polynomial::new(vec![Gf256::alpha_pow(k as i32), Gf256::ONE]);
            poly = poly.mul(&factor);
        }
        poly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_degree_matches_n() {
        for n in 1..=30 {
            let g = Gf256Polynomial::reed_solomon_generator(n);
            assert_eq!(g.degree(), n);
            assert_eq!(g.coeff(n), Gf256::ONE, "generator must be monic");
        }
    }

    #[test]
    fn rem_of_multiple_is_zero() {
        let g = Gf256Polynomial::reed_solomon_generator(7);
        let data = Gf256Polynomial::new(vec![
            Gf256::new(1),
            Gf256::new(2),
            Gf256::new(3),
            Gf256::new(4),
        ]);
        let product = data.mul(&g);
        assert!(product.rem(&g).is_zero());
    }

    #[test]
    fn evaluate_at_zero_is_constant_term() {
        let p = Gf256Polynomial::new(vec![Gf256::new(5), Gf256::new(9)]);
        assert_eq!(p.evaluate(Gf256::ZERO), Gf256::new(5));
    }

    #[test]
    fn strip_trailing_zeros() {
        let p = Gf256Polynomial::new(vec![Gf256::new(1), Gf256::ZERO, Gf256::ZERO]);
        assert_eq!(p.degree(), 0);
    }
}
