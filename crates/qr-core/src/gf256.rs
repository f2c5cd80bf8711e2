//! Arithmetic in GF(256) under the QR Code primitive polynomial
//! `x^8 + x^4 + x^3 + x^2 + 1`, primitive root `alpha = 2`.
//!
//! Multiplication and division are table-driven (log/exp), built once at
//! first use, rather than the Russian-peasant bit-twiddling some QR
//! implementations inline by hand.

use std::sync::OnceLock;

const PRIMITIVE_POLY: u16 = 0b1_0001_1101;

struct Tables {
    exp: [u8; 255],
    log: [u8; 256], // log[0] is unused (0 has no logarithm)
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 255];
        let mut log = [0u8; 256];
        let mut element: u16 = 1;
        for i in 0..255 {
            exp[i] = element as u8;
            log[element as usize] = i as u8;
            element <<= 1;
            if element & 0x100 != 0 {
                element ^= PRIMITIVE_POLY;
            }
        }
        Tables { exp, log }
    })
}

/// An element of GF(256).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Gf256(pub u8);

impl Gf256 {
    pub const ZERO: Gf256 = Gf256(0);
    pub const ONE: Gf256 = Gf256(1);

    pub fn new(value: u8) -> Self {
        Gf256(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    fn log(self) -> u8 {
        tables().log[self.0 as usize]
    }

    fn exp(power: i32) -> Gf256 {
        let p = power.rem_euclid(255) as usize;
        Gf256(tables().exp[p])
    }

    /// `alpha^power`.
    pub fn alpha_pow(power: i32) -> Gf256 {
        Gf256::exp(power)
    }

    pub fn mul(self, rhs: Gf256) -> Gf256 {
        if self.0 == 0 || rhs.0 == 0 {
            return Gf256::ZERO;
        }
        Gf256::exp(self.log() as i32 + rhs.log() as i32)
    }

    pub fn div(self, rhs: Gf256) -> Result<Gf256, crate::QrError> {
        if rhs.0 == 0 {
            return Err(crate::QrError::precondition("division by zero in GF(256)"));
        }
        if self.0 == 0 {
            return Ok(Gf256::ZERO);
        }
        Ok(Gf256::exp(self.log() as i32 - rhs.log() as i32))
    }

    pub fn pow(self, k: i32) -> Gf256 {
        if self.0 == 0 {
            return if k == 0 { Gf256::ONE } else { Gf256::ZERO };
        }
        Gf256::exp(self.log() as i32 * k)
    }

    pub fn inverse(self) -> Result<Gf256, crate::QrError> {
        Gf256::ONE.div(self)
    }
}

impl std::ops::Add for Gf256 {
    type Output = Gf256;
    fn add(self, rhs: Gf256) -> Gf256 {
        Gf256(self.0 ^ rhs.0)
    }
}

impl std::ops::Sub for Gf256 {
    type Output = Gf256;
    fn sub(self, rhs: Gf256) -> Gf256 {
        Gf256(self.0 ^ rhs.0)
    }
}

impl std::ops::Mul for Gf256 {
    type Output = Gf256;
    fn mul(self, rhs: Gf256) -> Gf256 {
        self.mul(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_0_is_one() {
        assert_eq!(Gf256::alpha_pow(0), Gf256::ONE);
    }

    #[test]
    fn alpha_255_wraps_to_one() {
        assert_eq!(Gf256::alpha_pow(255), Gf256::ONE);
    }

    #[test]
    fn mul_div_roundtrip() {
        for a in 1..=255u16 {
            for b in 1..=255u16 {
                let a = Gf256(a as u8);
                let b = Gf256(b as u8);
                let product = a.mul(b);
                assert_eq!(product.div(b).unwrap(), a);
            }
        }
    }

    #[test]
    fn mul_by_zero_is_zero() {
        assert_eq!(Gf256::new(200).mul(Gf256::ZERO), Gf256::ZERO);
    }

    #[test]
    fn pow_matches_repeated_mul() {
        let a = Gf256::new(7);
        let mut expect = Gf256::ONE;
        for _ in 0..5 {
            expect = expect.mul(a);
        }
        assert_eq!(a.pow(5), expect);
    }

    #[test]
    fn div_by_zero_errors() {
        assert!(Gf256::new(3).div(Gf256::ZERO).is_err());
    }

    #[test]
    fn inverse_is_multiplicative_identity() {
        for a in 1..=255u16 {
            let a = Gf256(a as u8);
            assert_eq!(a.mul(a.inverse().unwrap()), Gf256::ONE);
        }
    }
}
