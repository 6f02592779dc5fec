//! Division and remainder.

use std::cmp::Ordering;

use bn26_types::BnError;

use crate::bignum::{count_bits, BigNum, DoubleLimb, Limb, LIMB_BASE, LIMB_BITS, LIMB_MASK};

/// Which halves of a division to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivMode {
    Div,
    Mod,
    Both,
}

/// Result of [`BigNum::divmod`]. Halves not requested by the mode are `None`.
#[derive(Debug, Clone)]
pub struct DivModResult {
    pub div: Option<BigNum>,
    pub rem: Option<BigNum>,
}

impl BigNum {
    /// Divide, producing the halves selected by `mode`.
    ///
    /// The quotient truncates toward zero and the remainder takes the sign of the dividend.
    pub fn divmod(&self, num: &BigNum, mode: DivMode) -> Result<DivModResult, BnError> {
        check_divisor(num)?;
        let (div, rem) = self.divmod_signed(num, mode, false);
        Ok(DivModResult {
            div: (mode != DivMode::Mod).then_some(div),
            rem: (mode != DivMode::Div).then_some(rem),
        })
    }

    /// Quotient and remainder.
    pub fn div_rem(&self, num: &BigNum) -> Result<(BigNum, BigNum), BnError> {
        check_divisor(num)?;
        Ok(self.divmod_signed(num, DivMode::Both, false))
    }

    /// Truncating quotient.
    pub fn div(&self, num: &BigNum) -> Result<BigNum, BnError> {
        check_divisor(num)?;
        Ok(self.divmod_signed(num, DivMode::Div, false).0)
    }

    /// Remainder with the sign of the dividend.
    pub fn rem(&self, num: &BigNum) -> Result<BigNum, BnError> {
        check_divisor(num)?;
        Ok(self.divmod_signed(num, DivMode::Mod, false).1)
    }

    /// Non-negative remainder.
    pub fn umod(&self, num: &BigNum) -> Result<BigNum, BnError> {
        check_divisor(num)?;
        Ok(self.umod_nonzero(num))
    }

    /// Non-negative remainder for a divisor known to be non-zero.
    pub(crate) fn umod_nonzero(&self, num: &BigNum) -> BigNum {
        debug_assert!(!num.is_zero());
        self.divmod_signed(num, DivMode::Mod, true).1
    }

    /// Quotient rounded to the nearest integer, halves away from zero.
    pub fn div_round(&self, num: &BigNum) -> Result<BigNum, BnError> {
        let (mut q, r) = self.div_rem(num)?;
        if r.is_zero() {
            return Ok(q);
        }
        let twice = r.abs().ushln(1);
        if twice.ucmp(num) == Ordering::Less {
            return Ok(q);
        }
        if self.negative != num.negative {
            q.isubn(1);
        } else {
            q.iaddn(1);
        }
        Ok(q)
    }

    /// In-place division by a native integer, truncating toward zero.
    pub fn idivn(&mut self, num: i64) -> Result<&mut Self, BnError> {
        if num == 0 {
            return Err(BnError::DivisionByZero);
        }
        let mag = num.unsigned_abs();
        if mag < LIMB_BASE {
            self.idivrem_limb(mag as Limb);
            if num < 0 {
                self.ineg();
            }
            self.strip();
        } else {
            let q = self.divmod_signed(&BigNum::from_i64(num), DivMode::Div, false).0;
            self.limbs.clone_from(&q.limbs);
            self.negative = q.negative;
        }
        Ok(self)
    }

    /// Truncated quotient by a native integer.
    pub fn divn(&self, num: i64) -> Result<BigNum, BnError> {
        let mut r = self.clone();
        r.idivn(num)?;
        Ok(r)
    }

    /// Remainder by a native integer, with the sign of the dividend.
    pub fn modrn(&self, num: i64) -> Result<i64, BnError> {
        if num == 0 {
            return Err(BnError::DivisionByZero);
        }
        let mag = num.unsigned_abs();
        let r = if mag < LIMB_BASE {
            self.modrn_limb(mag as Limb) as i64
        } else {
            let rem = self.divmod_signed(&BigNum::from_i64(num), DivMode::Mod, false).1;
            // |rem| < |num| <= 2^63
            rem.magnitude_u64().unwrap_or(0) as i64
        };
        Ok(if self.negative { -r } else { r })
    }

    /// Alias of [`BigNum::modrn`].
    pub fn modn(&self, num: i64) -> Result<i64, BnError> {
        self.modrn(num)
    }

    /// Divide the magnitude by a single limb in place, returning the remainder.
    pub(crate) fn idivrem_limb(&mut self, d: Limb) -> Limb {
        let d = d as DoubleLimb;
        let mut rem: DoubleLimb = 0;
        for limb in self.limbs.iter_mut().rev() {
            let w = (rem << LIMB_BITS) | *limb as DoubleLimb;
            *limb = (w / d) as Limb;
            rem = w % d;
        }
        self.strip();
        rem as Limb
    }

    /// Remainder of the magnitude by a single limb.
    pub(crate) fn modrn_limb(&self, d: Limb) -> Limb {
        let d = d as DoubleLimb;
        let rem = self
            .limbs
            .iter()
            .rev()
            .fold(0, |acc: DoubleLimb, &l| ((acc << LIMB_BITS) | l as DoubleLimb) % d);
        rem as Limb
    }

    /// Signed division by a non-zero divisor. Halves not requested by `mode`
    /// are returned as zero. With `positive` the remainder is made non-negative.
    fn divmod_signed(&self, num: &BigNum, mode: DivMode, positive: bool) -> (BigNum, BigNum) {
        if self.is_zero() {
            return (BigNum::zero(), BigNum::zero());
        }
        match (self.negative, num.negative) {
            (true, false) => {
                let (mut div, mut rem) = self.neg().divmod_signed(num, mode, false);
                div.ineg();
                rem.ineg();
                if positive && rem.negative {
                    rem.iadd(num);
                }
                (div, rem)
            }
            (false, true) => {
                let (mut div, rem) = self.divmod_signed(&num.neg(), mode, false);
                div.ineg();
                (div, rem)
            }
            (true, true) => {
                let (div, mut rem) = self.neg().divmod_signed(&num.neg(), mode, false);
                rem.ineg();
                if positive && rem.negative {
                    rem.isub(num);
                }
                (div, rem)
            }
            (false, false) => self.divmod_magnitude(num, mode),
        }
    }

    fn divmod_magnitude(&self, num: &BigNum, mode: DivMode) -> (BigNum, BigNum) {
        if self.ucmp(num) == Ordering::Less {
            return (BigNum::zero(), self.clone_plain());
        }
        if num.limbs.len() == 1 {
            let mut q = self.clone_plain();
            let r = q.idivrem_limb(num.limbs[0]);
            return (q, BigNum::from_u64(r as u64));
        }
        word_div(self, num, mode)
    }
}

fn check_divisor(num: &BigNum) -> Result<(), BnError> {
    if num.is_zero() {
        return Err(BnError::DivisionByZero);
    }
    Ok(())
}

/// Subtract `num * mul` shifted left by `shift` limbs from `a` in place.
///
/// Returns `-1` if the result went negative, in which case `a` is negated to
/// hold its magnitude, and `0` otherwise.
fn ishlnsubmul(a: &mut [Limb], num: &[Limb], mul: Limb, shift: usize) -> i64 {
    let mut carry: i64 = 0;
    for (i, &d) in num.iter().enumerate() {
        let w = a[i + shift] as i64 + carry;
        let right = d as i64 * mul as i64;
        let w = w - (right & LIMB_MASK as i64);
        carry = (w >> LIMB_BITS) - (right >> LIMB_BITS);
        a[i + shift] = (w & LIMB_MASK as i64) as Limb;
    }
    for limb in a[num.len() + shift..].iter_mut() {
        let w = *limb as i64 + carry;
        carry = w >> LIMB_BITS;
        *limb = (w & LIMB_MASK as i64) as Limb;
    }
    if carry == 0 {
        return 0;
    }

    // Negative result: negate the whole buffer to get the magnitude back.
    debug_assert_eq!(carry, -1);
    let mut carry: i64 = 0;
    for limb in a.iter_mut() {
        let w = -(*limb as i64) + carry;
        carry = w >> LIMB_BITS;
        *limb = (w & LIMB_MASK as i64) as Limb;
    }
    -1
}

/// Schoolbook long division of magnitudes with `b` at least two limbs.
fn word_div(a: &BigNum, b: &BigNum, mode: DivMode) -> (BigNum, BigNum) {
    // Normalize so the top divisor limb has its high bit set.
    let shift = LIMB_BITS - count_bits(b.limbs[b.limbs.len() - 1]);
    let mut b = b.clone_plain();
    let mut a = a.clone_plain();
    if shift != 0 {
        b.iushln(shift);
        a.iushln(shift);
    }
    let bl = b.limbs.len();
    let bhi = b.limbs[bl - 1] as DoubleLimb;

    let m = a.limbs.len() - bl;
    let mut q = (mode != DivMode::Mod).then(|| vec![0 as Limb; m + 1]);

    let mut diff = a.limbs.clone();
    if ishlnsubmul(&mut diff, &b.limbs, 1, m) == 0 {
        a.limbs = diff;
        if let Some(q) = q.as_mut() {
            q[m] = 1;
        }
    }

    for j in (0..m).rev() {
        let hi = a.limbs[bl + j] as DoubleLimb;
        let lo = a.limbs[bl + j - 1] as DoubleLimb;
        let mut qj = (((hi << LIMB_BITS) | lo) / bhi).min(LIMB_MASK as DoubleLimb) as Limb;

        // Over-estimates leave a negative remainder; add b back until it is not.
        let mut negative = ishlnsubmul(&mut a.limbs, &b.limbs, qj, j) != 0;
        while negative {
            qj -= 1;
            // a holds the magnitude of the negative remainder: subtracting b
            // borrows exactly when adding b to the true value turns it non-negative.
            let flipped = ishlnsubmul(&mut a.limbs, &b.limbs, 1, j) != 0;
            negative = !flipped && a.limbs.iter().any(|&l| l != 0);
        }
        if let Some(q) = q.as_mut() {
            q[j] = qj;
        }
    }

    let div = match q {
        Some(q) => BigNum::from_limbs(q),
        None => BigNum::zero(),
    };
    let rem = if mode == DivMode::Div {
        BigNum::zero()
    } else {
        a.strip();
        a.iushrn(shift);
        a
    };
    (div, rem)
}
