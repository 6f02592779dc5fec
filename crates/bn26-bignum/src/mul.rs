//! Multiplication with schoolbook and FFT strategies.

use bn26_types::BnError;
use tracing::trace;

use crate::bignum::{BigNum, DoubleLimb, Limb, LIMB_BASE, LIMB_BITS, LIMB_MASK};
use crate::fft;

/// Combined operand length (in limbs) from which the FFT path is used.
pub const FFT_MUL_THRESHOLD: usize = 1024;

const MASK: DoubleLimb = LIMB_MASK as DoubleLimb;

/// Multiplication algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MulStrategy {
    /// Column-wise (comba) convolution.
    Schoolbook,
    /// Floating-point FFT convolution over 13-bit chunks.
    Fft,
}

impl MulStrategy {
    /// Pick the strategy for a combined operand length of `len` limbs.
    pub fn select(len: usize) -> Self {
        if len < FFT_MUL_THRESHOLD {
            MulStrategy::Schoolbook
        } else {
            MulStrategy::Fft
        }
    }
}

/// Product of two magnitudes, `a.len() + b.len()` limbs long (not stripped).
pub(crate) fn mul_limbs(a: &[Limb], b: &[Limb], strategy: MulStrategy) -> Vec<Limb> {
    match strategy {
        MulStrategy::Schoolbook => schoolbook_mul(a, b),
        MulStrategy::Fft => {
            let out = fft::fft_mul(a, b);
            trace!(
                a_len = a.len(),
                b_len = b.len(),
                transform_len = fft::guess_len_13b(a.len(), b.len()),
                "fft multiplication"
            );
            out
        }
    }
}

/// Column convolution: output limb `k` sums `a[k-j] * b[j]` with the low and
/// high 26-bit halves accumulated separately.
fn schoolbook_mul(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let len = a.len() + b.len();
    let mut out = vec![0 as Limb; len];
    let mut carry: DoubleLimb = 0;
    for (k, slot) in out.iter_mut().enumerate().take(len - 1) {
        let mut ncarry = carry >> LIMB_BITS;
        let mut rword = carry & MASK;
        let lo = (k + 1).saturating_sub(a.len());
        let hi = k.min(b.len() - 1);
        for j in lo..=hi {
            let r = a[k - j] as DoubleLimb * b[j] as DoubleLimb;
            ncarry += r >> LIMB_BITS;
            rword += r & MASK;
        }
        ncarry += rword >> LIMB_BITS;
        *slot = (rword & MASK) as Limb;
        carry = ncarry;
    }
    debug_assert!(carry < LIMB_BASE, "product overflowed its limb count");
    out[len - 1] = carry as Limb;
    out
}

impl BigNum {
    /// Multiplication: self * other, dispatched on the combined limb count.
    pub fn mul(&self, other: &BigNum) -> BigNum {
        self.mul_with(other, MulStrategy::select(self.limbs.len() + other.limbs.len()))
    }

    /// Multiplication using an explicit strategy.
    pub fn mul_with(&self, other: &BigNum, strategy: MulStrategy) -> BigNum {
        let mut out = BigNum::from_limbs(mul_limbs(&self.limbs, &other.limbs, strategy));
        out.negative = self.negative != other.negative;
        out.strip();
        out
    }

    /// Multiplication forced onto the FFT path.
    pub fn mulf(&self, other: &BigNum) -> BigNum {
        self.mul_with(other, MulStrategy::Fft)
    }

    /// In-place multiplication.
    pub fn imul(&mut self, other: &BigNum) -> &mut Self {
        let strategy = MulStrategy::select(self.limbs.len() + other.limbs.len());
        self.limbs = mul_limbs(&self.limbs, &other.limbs, strategy);
        self.negative ^= other.negative;
        self.strip()
    }

    /// Square: self * self.
    pub fn sqr(&self) -> BigNum {
        self.mul(self)
    }

    /// In-place square.
    pub fn isqr(&mut self) -> &mut Self {
        let strategy = MulStrategy::select(2 * self.limbs.len());
        self.limbs = mul_limbs(&self.limbs, &self.limbs, strategy);
        self.negative = false;
        self.strip()
    }

    /// `self^exp` by square-and-multiply. The exponent must be non-negative.
    pub fn pow(&self, exp: &BigNum) -> Result<BigNum, BnError> {
        if exp.negative {
            return Err(BnError::NegativeExponent);
        }
        let bits = exp.bit_len();
        let mut result = BigNum::one();
        let mut base = self.clone_plain();
        for i in 0..bits {
            if exp.testn(i) {
                result.imul(&base);
            }
            if i + 1 < bits {
                base.isqr();
            }
        }
        Ok(result)
    }

    /// In-place multiplication by a native integer.
    pub fn imuln(&mut self, num: i64) -> &mut Self {
        let mag = num.unsigned_abs();
        if mag < LIMB_BASE {
            self.imul_limb(mag as Limb);
        } else {
            self.imul(&BigNum::from_u64(mag));
        }
        if num < 0 {
            self.ineg();
        }
        self
    }

    /// Multiply by a native integer.
    pub fn muln(&self, num: i64) -> BigNum {
        let mut r = self.clone();
        r.imuln(num);
        r
    }

    /// Multiply the magnitude by a single limb.
    pub(crate) fn imul_limb(&mut self, w: Limb) -> &mut Self {
        let mut carry: DoubleLimb = 0;
        for limb in self.limbs.iter_mut() {
            let v = *limb as DoubleLimb * w as DoubleLimb + carry;
            *limb = (v & MASK) as Limb;
            carry = v >> LIMB_BITS;
        }
        if carry != 0 {
            self.limbs.push(carry as Limb);
        }
        self.strip()
    }
}
