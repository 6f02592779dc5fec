//! Signed addition and subtraction.

use std::cmp::Ordering;

use crate::bignum::{split_u64, ucmp_limbs, BigNum, Limb, LIMB_BITS, LIMB_MASK};

/// `a += b` on magnitudes. The result may grow by one limb.
fn add_mag(a: &mut Vec<Limb>, b: &[Limb]) {
    if a.len() < b.len() {
        a.resize(b.len(), 0);
    }
    let mut carry = 0;
    for (i, x) in a.iter_mut().enumerate() {
        if i >= b.len() && carry == 0 {
            break;
        }
        let s = *x + b.get(i).copied().unwrap_or(0) + carry;
        *x = s & LIMB_MASK;
        carry = s >> LIMB_BITS;
    }
    if carry != 0 {
        a.push(carry);
    }
}

/// Magnitude subtraction: `a = a - b` when `a >= b`, or `a = b - a` when `reverse`.
fn sub_mag(a: &mut Vec<Limb>, b: &[Limb], reverse: bool) {
    if a.len() < b.len() {
        a.resize(b.len(), 0);
    }
    let mut carry: i64 = 0;
    for (i, x) in a.iter_mut().enumerate() {
        let y = b.get(i).copied().unwrap_or(0) as i64;
        if !reverse && i >= b.len() && carry == 0 {
            break;
        }
        let r = if reverse {
            y - *x as i64 + carry
        } else {
            *x as i64 - y + carry
        };
        *x = (r & LIMB_MASK as i64) as Limb;
        carry = r >> LIMB_BITS;
    }
    debug_assert_eq!(carry, 0, "magnitude subtraction underflow");
}

impl BigNum {
    /// Add a signed magnitude in place.
    fn iadd_signed(&mut self, mag: &[Limb], negative: bool) -> &mut Self {
        if self.negative == negative {
            add_mag(&mut self.limbs, mag);
        } else {
            match ucmp_limbs(&self.limbs, mag) {
                Ordering::Equal => self.set_zero(),
                Ordering::Greater => sub_mag(&mut self.limbs, mag, false),
                Ordering::Less => {
                    sub_mag(&mut self.limbs, mag, true);
                    self.negative = negative;
                }
            }
        }
        self.strip()
    }

    /// In-place addition.
    pub fn iadd(&mut self, num: &BigNum) -> &mut Self {
        self.iadd_signed(&num.limbs, num.negative)
    }

    /// In-place subtraction.
    pub fn isub(&mut self, num: &BigNum) -> &mut Self {
        self.iadd_signed(&num.limbs, !num.negative)
    }

    /// Addition: self + other.
    pub fn add(&self, other: &BigNum) -> BigNum {
        let mut r = self.clone();
        r.limbs.reserve(other.limbs.len().saturating_sub(r.limbs.len()) + 1);
        r.iadd(other);
        r
    }

    /// Subtraction: self - other.
    pub fn sub(&self, other: &BigNum) -> BigNum {
        let mut r = self.clone();
        r.isub(other);
        r
    }

    /// In-place addition of a native integer.
    pub fn iaddn(&mut self, num: i64) -> &mut Self {
        let (buf, len) = split_u64(num.unsigned_abs());
        self.iadd_signed(&buf[..len], num < 0)
    }

    /// In-place subtraction of a native integer.
    pub fn isubn(&mut self, num: i64) -> &mut Self {
        let (buf, len) = split_u64(num.unsigned_abs());
        self.iadd_signed(&buf[..len], num >= 0)
    }

    /// Add a native integer.
    pub fn addn(&self, num: i64) -> BigNum {
        let mut r = self.clone();
        r.iaddn(num);
        r
    }

    /// Subtract a native integer.
    pub fn subn(&self, num: i64) -> BigNum {
        let mut r = self.clone();
        r.isubn(num);
        r
    }

    /// Add a single limb to the magnitude.
    pub(crate) fn iadd_limb(&mut self, w: Limb) -> &mut Self {
        add_mag(&mut self.limbs, &[w]);
        self.strip()
    }
}
