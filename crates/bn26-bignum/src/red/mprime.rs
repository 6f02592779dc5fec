//! Fast reduction modulo pseudo-Mersenne primes `p = 2^bits - k`.

use std::cmp::Ordering;
use std::fmt;

use bn26_types::BnError;

use crate::bignum::{BigNum, DoubleLimb, Limb, LIMB_BITS, LIMB_MASK};

/// A named prime with its bit length and `k = 2^bits - p`.
#[derive(Debug, Clone)]
pub struct PrimeParams {
    pub name: &'static str,
    pub p: BigNum,
    pub bits: usize,
    pub k: BigNum,
}

impl PrimeParams {
    /// Build the parameters from the prime's hex digits (whitespace allowed).
    pub fn new(name: &'static str, hex: &str) -> Result<Self, BnError> {
        let p = BigNum::from_str_radix(hex, 16)?;
        let bits = p.bit_len();
        let k = BigNum::one().ushln(bits).sub(&p);
        Ok(Self { name, p, bits, k })
    }
}

/// Reduction by splitting at `bits` and folding the high part back in times `k`.
///
/// Implementations may override [`split`](ReductionStrategy::split) and
/// [`imul_k`](ReductionStrategy::imul_k) with closed forms for their prime.
pub trait ReductionStrategy: fmt::Debug + Send + Sync {
    fn params(&self) -> &PrimeParams;

    /// Move the low `bits` bits of `input` into `out`, leaving the high part in `input`.
    fn split(&self, input: &mut BigNum, out: &mut BigNum) {
        input.iushrn_ext(self.params().bits, out);
    }

    /// Multiply `num` by `k` in place.
    fn imul_k(&self, num: &mut BigNum) {
        num.imul(&self.params().k);
    }

    /// Reduce a non-negative `num` into `[0, p)` in place.
    fn ireduce(&self, num: &mut BigNum) {
        let params = self.params();
        let mut low = BigNum::zero();
        loop {
            self.split(num, &mut low);
            self.imul_k(num);
            num.iadd(&low);
            if num.bit_len() <= params.bits {
                break;
            }
        }

        let cmp = if num.bit_len() < params.bits {
            Ordering::Less
        } else {
            num.ucmp(&params.p)
        };
        match cmp {
            Ordering::Equal => num.set_zero(),
            Ordering::Greater => {
                num.isub(&params.p);
            }
            Ordering::Less => {
                num.strip();
            }
        }
    }
}

/// Generic split/multiply reduction (p224, p192).
#[derive(Debug)]
pub(crate) struct GenericPrime(PrimeParams);

impl ReductionStrategy for GenericPrime {
    fn params(&self) -> &PrimeParams {
        &self.0
    }
}

/// secp256k1 field prime: `2^256 - 2^32 - 977`.
#[derive(Debug)]
pub(crate) struct K256(PrimeParams);

impl ReductionStrategy for K256 {
    fn params(&self) -> &PrimeParams {
        &self.0
    }

    /// Bit 256 sits 22 bits into limb 9, so the high part is rebuilt from
    /// the top 4 bits of each limb and the low 22 bits of the next.
    fn split(&self, input: &mut BigNum, out: &mut BigNum) {
        const MASK22: Limb = 0x3f_ffff;

        let out_len = input.limbs.len().min(9);
        out.limbs.clear();
        out.limbs.extend_from_slice(&input.limbs[..out_len]);
        out.negative = false;

        if input.limbs.len() <= 9 {
            input.set_zero();
            out.strip();
            return;
        }

        let mut prev = input.limbs[9];
        out.limbs.push(prev & MASK22);
        out.strip();

        let len = input.limbs.len();
        for i in 10..len {
            let next = input.limbs[i];
            input.limbs[i - 10] = ((next & MASK22) << 4) | (prev >> 22);
            prev = next;
        }
        input.limbs[len - 10] = prev >> 22;
        input.limbs.truncate(len - 9);
        input.strip();
    }

    /// `k = 0x1000003d1 = 0x40 * 2^26 + 0x3d1`.
    fn imul_k(&self, num: &mut BigNum) {
        num.limbs.push(0);
        num.limbs.push(0);
        let mut lo: DoubleLimb = 0;
        for limb in num.limbs.iter_mut() {
            let w = *limb as DoubleLimb;
            lo += w * 0x3d1;
            *limb = (lo & LIMB_MASK as DoubleLimb) as Limb;
            lo = w * 0x40 + (lo >> LIMB_BITS);
        }
        num.strip();
    }
}

/// Curve25519 field prime: `2^255 - 19`.
#[derive(Debug)]
pub(crate) struct P25519(PrimeParams);

impl ReductionStrategy for P25519 {
    fn params(&self) -> &PrimeParams {
        &self.0
    }

    fn imul_k(&self, num: &mut BigNum) {
        num.imul_limb(19);
    }
}

/// Build the strategy for a named prime.
pub(crate) fn named(name: &str) -> Result<Box<dyn ReductionStrategy>, BnError> {
    let strategy: Box<dyn ReductionStrategy> = match name {
        "k256" => Box::new(K256(PrimeParams::new(
            "k256",
            "ffffffff ffffffff ffffffff ffffffff ffffffff ffffffff fffffffe fffffc2f",
        )?)),
        "p224" => Box::new(GenericPrime(PrimeParams::new(
            "p224",
            "ffffffff ffffffff ffffffff ffffffff 00000000 00000000 00000001",
        )?)),
        "p192" => Box::new(GenericPrime(PrimeParams::new(
            "p192",
            "ffffffff ffffffff ffffffff fffffffe ffffffff ffffffff",
        )?)),
        "p25519" => Box::new(P25519(PrimeParams::new(
            "p25519",
            "7fffffffffffffff ffffffffffffffff ffffffffffffffff ffffffffffffffed",
        )?)),
        _ => return Err(BnError::UnknownPrime(name.to_string())),
    };
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> BigNum {
        BigNum::from_str_radix(s, 16).unwrap()
    }

    /// Deterministic large test value spanning ~600 bits.
    fn big_value() -> BigNum {
        hex("9f1c2b3a4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8\
             0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210\
             deadbeefcafebabe0011223344556677")
    }

    #[test]
    fn test_params() {
        let k256 = named("k256").unwrap();
        assert_eq!(k256.params().bits, 256);
        assert_eq!(k256.params().k, hex("1000003d1"));
        let p25519 = named("p25519").unwrap();
        assert_eq!(p25519.params().bits, 255);
        assert_eq!(p25519.params().k, BigNum::from_u64(19));
        assert_eq!(named("p192").unwrap().params().bits, 192);
        assert_eq!(named("p224").unwrap().params().bits, 224);
        assert_eq!(named("p521").err(), Some(BnError::UnknownPrime("p521".into())));
    }

    #[test]
    fn test_k256_split_matches_generic() {
        let k256 = named("k256").unwrap();
        let generic = GenericPrime(k256.params().clone());
        let mut a = big_value();
        let mut b = big_value();
        let mut lo_a = BigNum::zero();
        let mut lo_b = BigNum::zero();
        k256.split(&mut a, &mut lo_a);
        generic.split(&mut b, &mut lo_b);
        assert_eq!(a, b);
        assert_eq!(lo_a, lo_b);
        assert_eq!(a, big_value().ushrn(256));
    }

    #[test]
    fn test_k256_imul_k_matches_generic() {
        let k256 = named("k256").unwrap();
        let generic = GenericPrime(k256.params().clone());
        let mut a = big_value();
        let mut b = big_value();
        k256.imul_k(&mut a);
        generic.imul_k(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ireduce_matches_umod() {
        for name in ["k256", "p224", "p192", "p25519"] {
            let s = named(name).unwrap();
            let p = s.params().p.clone();
            for v in [big_value(), p.clone(), p.addn(5), p.subn(1), BigNum::zero(), big_value().sqr()] {
                let mut r = v.clone();
                s.ireduce(&mut r);
                assert_eq!(r, v.umod(&p).unwrap(), "{name} reduction of {v:?}");
            }
        }
    }
}
