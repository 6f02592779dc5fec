//! FFT convolution for large operands.
//!
//! Limbs are split into 13-bit chunks so that the exact convolution sums fit
//! comfortably in the 53-bit mantissa of an `f64` for every operand size the
//! dispatcher sends here.

use std::f64::consts::PI;

use crate::bignum::{DoubleLimb, Limb, LIMB_BITS, LIMB_MASK};

const CHUNK_BITS: usize = 13;
const CHUNK_MASK: DoubleLimb = (1 << CHUNK_BITS) - 1;

/// Transform length for operands of `n` and `m` limbs: room for the full
/// product in 13-bit chunks, rounded up to a power of two.
pub(crate) fn guess_len_13b(n: usize, m: usize) -> usize {
    (4 * n.max(m)).next_power_of_two().max(2)
}

/// Reverse the low `bits` bits of `x`.
fn rev_bin(x: usize, bits: u32) -> usize {
    let mut rb = 0;
    for i in 0..bits {
        rb |= ((x >> i) & 1) << (bits - i - 1);
    }
    rb
}

/// Bit-reversal permutation table for a transform of length `n`.
fn make_rbt(n: usize) -> Vec<usize> {
    let bits = n.trailing_zeros();
    (0..n).map(|i| rev_bin(i, bits)).collect()
}

/// Precomputed tables for one transform length.
struct FftPlan {
    n: usize,
    rbt: Vec<usize>,
    /// `(cos, sin)` of `2*pi*k/n` for `k < n/2`.
    twiddles: Vec<(f64, f64)>,
}

impl FftPlan {
    fn new(n: usize) -> Self {
        let step = 2.0 * PI / n as f64;
        let twiddles = (0..n / 2)
            .map(|k| {
                let angle = step * k as f64;
                (angle.cos(), angle.sin())
            })
            .collect();
        Self {
            n,
            rbt: make_rbt(n),
            twiddles,
        }
    }

    /// Iterative in-place radix-2 transform of `(rws, iws)` into `(rtws, itws)`.
    fn transform(&self, rws: &[f64], iws: &[f64], rtws: &mut [f64], itws: &mut [f64]) {
        let n = self.n;
        for i in 0..n {
            rtws[i] = rws[self.rbt[i]];
            itws[i] = iws[self.rbt[i]];
        }

        let mut s = 1;
        while s < n {
            let l = s << 1;
            let stride = n / l;
            for p in (0..n).step_by(l) {
                for j in 0..s {
                    let (wr, wi) = self.twiddles[j * stride];
                    let re = rtws[p + j];
                    let ie = itws[p + j];
                    let ro0 = rtws[p + j + s];
                    let io0 = itws[p + j + s];

                    let ro = wr * ro0 - wi * io0;
                    let io = wr * io0 + wi * ro0;

                    rtws[p + j] = re + ro;
                    itws[p + j] = ie + io;
                    rtws[p + j + s] = re - ro;
                    itws[p + j + s] = ie - io;
                }
            }
            s = l;
        }
    }
}

fn conjugate(iws: &mut [f64]) {
    for v in iws.iter_mut() {
        *v = -*v;
    }
}

/// Split 26-bit limbs into 13-bit chunks, zero-filling the rest of `out`.
fn convert_13b(limbs: &[Limb], out: &mut [f64]) {
    let mut carry: DoubleLimb = 0;
    for (i, &w) in limbs.iter().enumerate() {
        carry += w as DoubleLimb;
        out[2 * i] = (carry & CHUNK_MASK) as f64;
        carry >>= CHUNK_BITS;
        out[2 * i + 1] = (carry & CHUNK_MASK) as f64;
        carry >>= CHUNK_BITS;
    }
    assert_eq!(carry, 0, "13-bit split left a residual carry");
    for v in out[2 * limbs.len()..].iter_mut() {
        *v = 0.0;
    }
}

/// Round the scaled inverse transform and carry it back into `len` 26-bit limbs.
fn normalize_13b(ws: &[f64], n: usize, len: usize) -> Vec<Limb> {
    let scale = n as f64;
    let mut out = Vec::with_capacity(n / 2);
    let mut carry: DoubleLimb = 0;
    for i in 0..n / 2 {
        let hi = (ws[2 * i + 1] / scale).round() as DoubleLimb;
        let lo = (ws[2 * i] / scale).round() as DoubleLimb;
        let w = (hi << CHUNK_BITS) + lo + carry;
        out.push((w & LIMB_MASK as DoubleLimb) as Limb);
        carry = w >> LIMB_BITS;
    }
    assert_eq!(carry, 0, "FFT product left a residual carry");
    debug_assert!(out[len.min(out.len())..].iter().all(|&l| l == 0));
    out.resize(len, 0);
    out
}

/// Product of two magnitudes via floating-point convolution, `a.len() + b.len()` limbs long.
pub(crate) fn fft_mul(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let n = guess_len_13b(a.len(), b.len());
    let plan = FftPlan::new(n);
    let zeros = vec![0.0; n];

    let mut rws = vec![0.0; n];
    convert_13b(a, &mut rws);
    let mut nrws = vec![0.0; n];
    convert_13b(b, &mut nrws);

    let mut rwst = vec![0.0; n];
    let mut iwst = vec![0.0; n];
    plan.transform(&rws, &zeros, &mut rwst, &mut iwst);

    let mut nrwst = vec![0.0; n];
    let mut niwst = vec![0.0; n];
    plan.transform(&nrws, &zeros, &mut nrwst, &mut niwst);

    for i in 0..n {
        let rx = rwst[i] * nrwst[i] - iwst[i] * niwst[i];
        iwst[i] = rwst[i] * niwst[i] + iwst[i] * nrwst[i];
        rwst[i] = rx;
    }

    // Inverse transform as conj(F(conj(x))); only the real part is kept.
    conjugate(&mut iwst);
    let mut rmws = vec![0.0; n];
    let mut imws = vec![0.0; n];
    plan.transform(&rwst, &iwst, &mut rmws, &mut imws);

    normalize_13b(&rmws, n, a.len() + b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_len() {
        assert_eq!(guess_len_13b(1, 1), 4);
        assert_eq!(guess_len_13b(3, 5), 32);
        assert_eq!(guess_len_13b(512, 512), 2048);
    }

    #[test]
    fn test_rbt() {
        assert_eq!(make_rbt(8), vec![0, 4, 2, 6, 1, 5, 3, 7]);
        assert_eq!(rev_bin(1, 4), 8);
    }

    #[test]
    fn test_convert_13b() {
        let mut out = vec![9.0; 6];
        convert_13b(&[0x3ffffff, 0x2001], &mut out);
        assert_eq!(out, vec![8191.0, 8191.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fft_mul_single_limbs() {
        let p = fft_mul(&[LIMB_MASK], &[LIMB_MASK]);
        let expect = (LIMB_MASK as u64) * (LIMB_MASK as u64);
        assert_eq!(p, vec![(expect & LIMB_MASK as u64) as Limb, (expect >> 26) as Limb]);
    }

    #[test]
    fn test_fft_mul_carries() {
        // (2^78 - 1) * 3
        let p = fft_mul(&[LIMB_MASK; 3], &[3]);
        assert_eq!(p, vec![LIMB_MASK - 2, LIMB_MASK, LIMB_MASK, 2]);
    }
}
