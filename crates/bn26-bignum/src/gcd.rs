//! GCD and modular inverse operations.

use std::cmp::Ordering;

use bn26_types::BnError;

use crate::bignum::BigNum;

/// Bézout coefficients: `a * x + b * p == gcd` for `x.egcd(p)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Egcd {
    pub a: BigNum,
    pub b: BigNum,
    pub gcd: BigNum,
}

/// Strip trailing zero bits from `v`, halving the coefficient pair once per bit.
///
/// Before each halving, `(u, w)` is moved by `(+up, -wp)` if either is odd,
/// which keeps `u * x + w * p` unchanged.
fn halve_pair(v: &mut BigNum, u: &mut BigNum, w: &mut BigNum, up: &BigNum, wp: &BigNum) {
    let shift = v.zero_bits();
    if shift == 0 {
        return;
    }
    v.iushrn(shift);
    for _ in 0..shift {
        if u.is_odd() || w.is_odd() {
            u.iadd(up);
            w.isub(wp);
        }
        u.iushrn(1);
        w.iushrn(1);
    }
}

/// Strip trailing zero bits from `v`, halving `x` modulo the odd `delta`.
fn halve_mod(v: &mut BigNum, x: &mut BigNum, delta: &BigNum) {
    let shift = v.zero_bits();
    if shift == 0 {
        return;
    }
    v.iushrn(shift);
    for _ in 0..shift {
        if x.is_odd() {
            x.iadd(delta);
        }
        x.iushrn(1);
    }
}

impl BigNum {
    /// Greatest common divisor of the magnitudes (binary algorithm). `gcd(0, x) == |x|`.
    pub fn gcd(&self, other: &BigNum) -> BigNum {
        if self.is_zero() {
            return other.clone_plain().abs();
        }
        if other.is_zero() {
            return self.clone_plain().abs();
        }

        let mut a = self.clone_plain().abs();
        let mut b = other.clone_plain().abs();

        // Remove common factors of two
        let shift = a.zero_bits().min(b.zero_bits());
        a.iushrn(shift);
        b.iushrn(shift);

        while !a.is_zero() {
            let za = a.zero_bits();
            a.iushrn(za);
            let zb = b.zero_bits();
            b.iushrn(zb);
            if a.ucmp(&b) != Ordering::Less {
                a.isub(&b);
            } else {
                b.isub(&a);
            }
        }
        b.iushln(shift);
        b
    }

    /// Extended binary GCD against a positive modulus `p`.
    pub fn egcd(&self, p: &BigNum) -> Result<Egcd, BnError> {
        if p.is_negative() || p.is_zero() {
            return Err(BnError::InvalidModulus);
        }
        let mut x = if self.is_negative() {
            self.umod_nonzero(p)
        } else {
            self.clone_plain()
        };
        let mut y = p.clone_plain();

        let mut a = BigNum::one();
        let mut b = BigNum::zero();
        let mut c = BigNum::zero();
        let mut d = BigNum::one();

        let mut g = 0;
        while x.is_even() && y.is_even() && !x.is_zero() {
            x.iushrn(1);
            y.iushrn(1);
            g += 1;
        }

        let yp = y.clone();
        let xp = x.clone();

        while !x.is_zero() {
            halve_pair(&mut x, &mut a, &mut b, &yp, &xp);
            halve_pair(&mut y, &mut c, &mut d, &yp, &xp);
            if x >= y {
                x.isub(&y);
                a.isub(&c);
                b.isub(&d);
            } else {
                y.isub(&x);
                c.isub(&a);
                d.isub(&b);
            }
        }

        // c and d are coefficients for the reduced x; move them back onto self.
        if self.is_negative() {
            let reduced = self.umod_nonzero(p);
            let k = reduced.sub(self).div(p)?;
            d.iadd(&c.mul(&k));
        }

        y.iushln(g);
        Ok(Egcd { a: c, b: d, gcd: y })
    }

    /// Modular inverse via [`BigNum::egcd`], reduced into `[0, p)`.
    pub fn invm(&self, p: &BigNum) -> Result<BigNum, BnError> {
        let e = self.egcd(p)?;
        if !e.gcd.is_one() {
            return Err(BnError::NoInverse);
        }
        Ok(e.a.umod_nonzero(p))
    }

    /// Modular inverse for an odd modulus `p > 1`, halving the coefficients modulo `p`.
    pub fn invmp(&self, p: &BigNum) -> Result<BigNum, BnError> {
        if p.is_negative() || p.is_even() || p.cmpn(1) != Ordering::Greater {
            return Err(BnError::InvalidModulus);
        }
        let mut a = self.umod_nonzero(p);
        let mut b = p.clone_plain();
        let mut x1 = BigNum::one();
        let mut x2 = BigNum::zero();

        while a.gtn(1) && b.gtn(1) {
            halve_mod(&mut a, &mut x1, p);
            halve_mod(&mut b, &mut x2, p);
            if a >= b {
                a.isub(&b);
                x1.isub(&x2);
            } else {
                b.isub(&a);
                x2.isub(&x1);
            }
        }

        let res = if a.is_one() {
            x1
        } else if b.is_one() {
            x2
        } else {
            return Err(BnError::NoInverse);
        };
        Ok(res.umod_nonzero(p))
    }
}
