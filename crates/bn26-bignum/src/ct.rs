//! Constant-time operations for big numbers.
//!
//! Loops run over the longer operand's limb count and avoid data-dependent
//! branching on limb values.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::bignum::{BigNum, Limb, LIMB_MASK};

impl BigNum {
    /// Constant-time equality comparison.
    pub fn ct_eq(&self, other: &BigNum) -> Choice {
        let max_len = self.limbs.len().max(other.limbs.len());
        let mut result = (self.negative as u8).ct_eq(&(other.negative as u8));
        for i in 0..max_len {
            result &= self.limb(i).ct_eq(&other.limb(i));
        }
        result
    }

    /// Constant-time conditional select: returns `a` if choice == 0, `b` if choice == 1.
    pub fn ct_select(a: &BigNum, b: &BigNum, choice: Choice) -> BigNum {
        let max_len = a.limbs.len().max(b.limbs.len());
        let limbs = (0..max_len)
            .map(|i| Limb::conditional_select(&a.limb(i), &b.limb(i), choice))
            .collect();
        let negative = u8::conditional_select(&(a.negative as u8), &(b.negative as u8), choice);

        let mut result = BigNum::from_limbs(limbs);
        result.negative = negative != 0;
        result.strip();
        result
    }

    /// Constant-time conditional subtraction on magnitudes: `self - modulus`
    /// if `self >= modulus`, otherwise `self`.
    pub fn ct_sub_if_gte(&self, modulus: &BigNum) -> BigNum {
        let max_len = self.limbs.len().max(modulus.limbs.len());

        let mut diff = vec![0 as Limb; max_len];
        let mut borrow: i64 = 0;
        for (i, d) in diff.iter_mut().enumerate() {
            let w = self.limb(i) as i64 - modulus.limb(i) as i64 - borrow;
            *d = (w & LIMB_MASK as i64) as Limb;
            borrow = (w >> 63) & 1;
        }

        // borrow == 0 means self >= modulus
        let use_diff = Choice::from((borrow ^ 1) as u8);
        let diff_bn = BigNum::from_limbs(diff);
        BigNum::ct_select(&self.abs(), &diff_bn, use_diff)
    }
}

impl ConstantTimeEq for BigNum {
    fn ct_eq(&self, other: &Self) -> Choice {
        BigNum::ct_eq(self, other)
    }
}
