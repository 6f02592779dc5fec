//! Montgomery multiplication for odd moduli.

use bn26_types::BnError;

use crate::bignum::{ucmp_limbs, BigNum, DoubleLimb, Limb, LIMB_BITS, LIMB_MASK};

/// Montgomery multiplication context.
///
/// Precomputes values needed for efficient modular multiplication
/// using the Montgomery form: R = 2^(m_size * LIMB_BITS).
#[derive(Debug)]
pub(crate) struct Montgomery {
    /// The modulus N (must be odd).
    modulus: BigNum,
    /// Number of limbs in the modulus.
    m_size: usize,
    /// N' such that N[0] * N' ≡ -1 (mod 2^26).
    n_prime: Limb,
    /// R² mod N, used for encoding into Montgomery form.
    r_squared: BigNum,
}

impl Montgomery {
    /// Create a new Montgomery context for the given odd modulus.
    pub(crate) fn new(modulus: &BigNum) -> Result<Self, BnError> {
        if modulus.is_zero() {
            return Err(BnError::DivisionByZero);
        }
        if modulus.is_even() || modulus.is_negative() {
            return Err(BnError::InvalidModulus);
        }

        let m_size = modulus.num_limbs();
        let n_prime = compute_n_prime(modulus.limbs[0]);
        let r_squared = compute_r_squared(modulus, m_size);

        Ok(Self {
            modulus: modulus.clone_plain(),
            m_size,
            n_prime,
            r_squared,
        })
    }

    /// Convert a value into Montgomery form: aR mod N.
    pub(crate) fn to_mont(&self, a: &BigNum) -> BigNum {
        let a_reduced = a.umod_nonzero(&self.modulus);
        self.reduce(&a_reduced.mul(&self.r_squared))
    }

    /// Convert from Montgomery form back to normal: a * R^(-1) mod N.
    pub(crate) fn from_mont(&self, a_mont: &BigNum) -> BigNum {
        self.reduce(a_mont)
    }

    /// Montgomery multiplication: (a * b * R^(-1)) mod N.
    pub(crate) fn mul(&self, a: &BigNum, b: &BigNum) -> BigNum {
        self.reduce(&a.mul(b))
    }

    /// Montgomery squaring: (a² * R^(-1)) mod N.
    pub(crate) fn sqr(&self, a: &BigNum) -> BigNum {
        self.reduce(&a.sqr())
    }

    /// Inverse of a Montgomery-form value, in Montgomery form: `a^-1 * R mod N`.
    pub(crate) fn invm(&self, a: &BigNum) -> Result<BigNum, BnError> {
        // invmp(aR) = a^-1 R^-1, so two factors of R restore the form.
        let inv = a.invmp(&self.modulus)?;
        Ok(inv.mul(&self.r_squared).umod_nonzero(&self.modulus))
    }

    /// Montgomery REDC: given T < N*R, compute T * R^(-1) mod N.
    ///
    /// ```text
    /// for i = 0 to m_size-1:
    ///   q_i = t[i] * n_prime mod 2^26
    ///   T = T + q_i * N * 2^(i*26)
    /// T = T >> (m_size * 26)
    /// if T >= N: T = T - N
    /// ```
    ///
    /// Inputs outside `[0, N*R)` are reduced modulo N first.
    fn reduce(&self, t: &BigNum) -> BigNum {
        let m = self.m_size;
        let mod_limbs = &self.modulus.limbs;

        let reduced;
        // t < N*R exactly when t / R < N
        let oversized = t.limbs.len() > m && ucmp_limbs(&t.limbs[m..], mod_limbs).is_ge();
        let t = if oversized || t.is_negative() {
            reduced = t.umod_nonzero(&self.modulus);
            &reduced
        } else {
            t
        };

        // Work buffer: need at least 2*m + 1 limbs
        let mut work = vec![0 as Limb; 2 * m + 2];
        work[..t.limbs.len()].copy_from_slice(&t.limbs);

        for i in 0..m {
            let q = (work[i] as DoubleLimb * self.n_prime as DoubleLimb) & LIMB_MASK as DoubleLimb;

            // Add q * N shifted by i positions
            let mut carry: DoubleLimb = 0;
            for j in 0..m {
                let prod = q * mod_limbs[j] as DoubleLimb + work[i + j] as DoubleLimb + carry;
                work[i + j] = (prod & LIMB_MASK as DoubleLimb) as Limb;
                carry = prod >> LIMB_BITS;
            }
            // Propagate carry
            let mut k = i + m;
            while carry != 0 && k < work.len() {
                let sum = work[k] as DoubleLimb + carry;
                work[k] = (sum & LIMB_MASK as DoubleLimb) as Limb;
                carry = sum >> LIMB_BITS;
                k += 1;
            }
        }

        let mut result = BigNum::from_limbs(work[m..].to_vec());
        if result.ucmp(&self.modulus).is_ge() {
            result.isub(&self.modulus);
        }
        result
    }
}

/// Compute R² mod N where R = 2^(m_size * 26).
fn compute_r_squared(modulus: &BigNum, m_size: usize) -> BigNum {
    BigNum::one()
        .ushln(2 * m_size * LIMB_BITS)
        .umod_nonzero(modulus)
}

/// Compute N' such that N[0] * N' ≡ -1 (mod 2^26).
///
/// Uses Newton's method: x = x * (2 - n0 * x), each step doubling the
/// number of correct low bits.
fn compute_n_prime(n0: Limb) -> Limb {
    let n0 = n0 as u64;
    let mut x: u64 = 1;
    for _ in 0..6 {
        x = x.wrapping_mul(2u64.wrapping_sub(n0.wrapping_mul(x)));
    }
    (x.wrapping_neg() & LIMB_MASK as u64) as Limb
}
