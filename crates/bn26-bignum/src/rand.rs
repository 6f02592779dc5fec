//! Random big number generation using OS randomness.

use bn26_types::BnError;
use zeroize::Zeroize;

use crate::bignum::BigNum;

/// Fill `bits` random bits (big-endian buffer) and return them as a BigNum.
fn random_bits(bits: usize) -> Result<BigNum, BnError> {
    let num_bytes = bits.div_ceil(8);
    let mut buf = vec![0u8; num_bytes];
    getrandom::getrandom(&mut buf).map_err(|_| BnError::RandGenFail)?;

    // Mask excess bits in the most significant byte
    let excess = num_bytes * 8 - bits;
    if excess > 0 {
        buf[0] &= 0xFF >> excess;
    }

    let result = BigNum::from_bytes_be(&buf);
    buf.zeroize();
    Ok(result)
}

impl BigNum {
    /// Generate a random BigNum with exactly `bits` bits.
    ///
    /// If `odd` is true, the least significant bit is forced to 1.
    pub fn random(bits: usize, odd: bool) -> Result<BigNum, BnError> {
        if bits == 0 {
            return Ok(BigNum::zero());
        }
        let mut result = random_bits(bits)?;
        result.setn(bits - 1, true);
        if odd {
            result.setn(0, true);
        }
        Ok(result)
    }

    /// Generate a random BigNum uniformly in [1, upper) by rejection sampling.
    pub fn random_range(upper: &BigNum) -> Result<BigNum, BnError> {
        if upper.is_negative() || upper.lten(1) {
            return Err(BnError::InvalidModulus);
        }
        let bits = upper.bit_len();
        loop {
            let candidate = random_bits(bits)?;
            if !candidate.is_zero() && candidate.ucmp(upper).is_lt() {
                return Ok(candidate);
            }
        }
    }

    /// Generate a random BigNum uniformly in [0, upper).
    pub fn random_below(upper: &BigNum) -> Result<BigNum, BnError> {
        if upper.is_negative() || upper.is_zero() {
            return Err(BnError::InvalidModulus);
        }
        let bits = upper.bit_len();
        loop {
            let candidate = random_bits(bits)?;
            if candidate.ucmp(upper).is_lt() {
                return Ok(candidate);
            }
        }
    }
}
