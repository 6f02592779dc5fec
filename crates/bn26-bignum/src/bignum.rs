//! Big number type and basic operations.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bn26_types::BnError;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::red::ReductionContext;

/// Limb type for big number representation. Only the low [`LIMB_BITS`] bits are used.
pub type Limb = u32;
/// Double-width type for multiplication intermediates.
pub type DoubleLimb = u64;

/// Bits per limb.
pub const LIMB_BITS: usize = 26;
/// Mask of the significant bits of a limb.
pub const LIMB_MASK: Limb = (1 << LIMB_BITS) - 1;
/// Radix of one limb.
pub(crate) const LIMB_BASE: DoubleLimb = 1 << LIMB_BITS;

/// Largest magnitude accepted by [`BigNum::from_number`] and produced by [`BigNum::to_number`].
pub(crate) const SAFE_INTEGER_BITS: usize = 53;

/// A heap-allocated big number that is zeroized on drop.
///
/// Internally represented as a little-endian array of 26-bit limbs stored in
/// `u32`, so that limb products and column sums stay well inside 64 bits.
/// The representation is always normalized: no most-significant zero limbs
/// (zero itself is `[0]`) and zero is never negative.
///
/// A value may carry a [`ReductionContext`]; such values hold residues in the
/// context's representation and are combined with the `red_*` methods.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BigNum {
    /// Little-endian limbs (limbs[0] is the least significant).
    pub(crate) limbs: Vec<Limb>,
    /// True if the number is negative.
    pub(crate) negative: bool,
    /// Reduction context the value lives in, if any.
    #[zeroize(skip)]
    pub(crate) red: Option<Arc<ReductionContext>>,
}

impl BigNum {
    /// Create a zero-valued BigNum.
    pub fn zero() -> Self {
        Self {
            limbs: vec![0],
            negative: false,
            red: None,
        }
    }

    /// Create a BigNum equal to one.
    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// Create a BigNum from a `u64` value.
    pub fn from_u64(value: u64) -> Self {
        let (buf, len) = split_u64(value);
        Self {
            limbs: buf[..len].to_vec(),
            negative: false,
            red: None,
        }
    }

    /// Create a BigNum from an `i64` value.
    pub fn from_i64(value: i64) -> Self {
        let mut bn = Self::from_u64(value.unsigned_abs());
        bn.negative = value < 0;
        bn.strip();
        bn
    }

    /// Create a BigNum from a safe integer, i.e. one whose magnitude is below `2^53`.
    pub fn from_number(value: i64) -> Result<Self, BnError> {
        if value.unsigned_abs() >> SAFE_INTEGER_BITS != 0 {
            return Err(BnError::NumberOverflow);
        }
        Ok(Self::from_i64(value))
    }

    /// Create a BigNum from a vector of little-endian 26-bit limbs.
    ///
    /// # Panics
    ///
    /// Panics if a limb does not fit in [`LIMB_BITS`] bits.
    pub fn from_limbs(limbs: Vec<Limb>) -> Self {
        assert!(
            limbs.iter().all(|&l| l <= LIMB_MASK),
            "limb exceeds {LIMB_BITS} bits"
        );
        let mut bn = Self {
            limbs,
            negative: false,
            red: None,
        };
        bn.strip();
        bn
    }

    /// Return the limbs as a slice.
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Return the number of significant limbs.
    pub fn num_limbs(&self) -> usize {
        self.limbs.len()
    }

    /// Limb at `idx`, or zero past the most significant limb.
    pub(crate) fn limb(&self, idx: usize) -> Limb {
        self.limbs.get(idx).copied().unwrap_or(0)
    }

    /// Return true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.len() == 1 && self.limbs[0] == 0
    }

    /// Return true if this number equals 1.
    pub fn is_one(&self) -> bool {
        !self.negative && self.limbs.len() == 1 && self.limbs[0] == 1
    }

    /// Return true if this number is negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Return true if this number is even.
    pub fn is_even(&self) -> bool {
        self.limbs[0] & 1 == 0
    }

    /// Return true if this number is odd.
    pub fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    /// Return the number of significant bits of the magnitude.
    pub fn bit_len(&self) -> usize {
        let top = self.limbs[self.limbs.len() - 1];
        (self.limbs.len() - 1) * LIMB_BITS + count_bits(top)
    }

    /// Return the number of bytes needed to hold the magnitude.
    pub fn byte_len(&self) -> usize {
        self.bit_len().div_ceil(8)
    }

    /// Remove leading zero limbs and clear the sign of zero.
    pub fn strip(&mut self) -> &mut Self {
        while self.limbs.len() > 1 && self.limbs[self.limbs.len() - 1] == 0 {
            self.limbs.pop();
        }
        if self.limbs.is_empty() {
            self.limbs.push(0);
        }
        if self.is_zero() {
            self.negative = false;
        }
        self
    }

    /// Grow the limb vector with zero limbs up to `size` limbs.
    pub(crate) fn expand(&mut self, size: usize) {
        if self.limbs.len() < size {
            self.limbs.resize(size, 0);
        }
    }

    /// Overwrite with zero, keeping the reduction context.
    pub(crate) fn set_zero(&mut self) {
        self.limbs.clear();
        self.limbs.push(0);
        self.negative = false;
    }

    /// Copy this value (including its reduction context) into `dest`.
    pub fn copy_into(&self, dest: &mut BigNum) {
        dest.limbs.clear();
        dest.limbs.extend_from_slice(&self.limbs);
        dest.negative = self.negative;
        dest.red = self.red.clone();
    }

    /// Clone the value without its reduction context.
    pub(crate) fn clone_plain(&self) -> BigNum {
        Self {
            limbs: self.limbs.clone(),
            negative: self.negative,
            red: None,
        }
    }

    /// Magnitude as a `u64`, if it fits.
    pub(crate) fn magnitude_u64(&self) -> Option<u64> {
        if self.bit_len() > 64 {
            return None;
        }
        Some(
            self.limbs
                .iter()
                .rev()
                .fold(0u64, |acc, &l| (acc << LIMB_BITS) | l as u64),
        )
    }

    /// Return `-self`.
    pub fn neg(&self) -> BigNum {
        let mut r = self.clone();
        r.ineg();
        r
    }

    /// Negate in place.
    pub fn ineg(&mut self) -> &mut Self {
        if !self.is_zero() {
            self.negative = !self.negative;
        }
        self
    }

    /// Return `|self|`.
    pub fn abs(&self) -> BigNum {
        let mut r = self.clone();
        r.negative = false;
        r
    }

    /// Clear the sign in place.
    pub fn iabs(&mut self) -> &mut Self {
        self.negative = false;
        self
    }

    /// Compare absolute values.
    pub fn ucmp(&self, other: &BigNum) -> Ordering {
        ucmp_limbs(&self.limbs, &other.limbs)
    }

    /// Compare with a native integer.
    pub fn cmpn(&self, num: i64) -> Ordering {
        match (self.negative, num < 0) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (neg, _) => {
                let ord = match self.magnitude_u64() {
                    Some(mag) => mag.cmp(&num.unsigned_abs()),
                    None => Ordering::Greater,
                };
                if neg {
                    ord.reverse()
                } else {
                    ord
                }
            }
        }
    }

    /// `self == num`.
    pub fn eqn(&self, num: i64) -> bool {
        self.cmpn(num) == Ordering::Equal
    }

    /// `self < num`.
    pub fn ltn(&self, num: i64) -> bool {
        self.cmpn(num) == Ordering::Less
    }

    /// `self <= num`.
    pub fn lten(&self, num: i64) -> bool {
        self.cmpn(num) != Ordering::Greater
    }

    /// `self > num`.
    pub fn gtn(&self, num: i64) -> bool {
        self.cmpn(num) == Ordering::Greater
    }

    /// `self >= num`.
    pub fn gten(&self, num: i64) -> bool {
        self.cmpn(num) != Ordering::Less
    }
}

/// Split a `u64` into at most three 26-bit limbs. Returns the buffer and the used length.
pub(crate) fn split_u64(mut value: u64) -> ([Limb; 3], usize) {
    let mut buf = [0; 3];
    let mut len = 0;
    loop {
        buf[len] = (value & LIMB_MASK as u64) as Limb;
        len += 1;
        value >>= LIMB_BITS;
        if value == 0 {
            return (buf, len);
        }
    }
}

/// Number of significant bits in a limb.
pub(crate) fn count_bits(w: Limb) -> usize {
    (Limb::BITS - w.leading_zeros()) as usize
}

/// Compare two normalized magnitudes.
pub(crate) fn ucmp_limbs(a: &[Limb], b: &[Limb]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    for i in (0..a.len()).rev() {
        if a[i] != b[i] {
            return a[i].cmp(&b[i]);
        }
    }
    Ordering::Equal
}

impl Default for BigNum {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for BigNum {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<i64> for BigNum {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u32> for BigNum {
    fn from(value: u32) -> Self {
        Self::from_u64(value as u64)
    }
}

impl fmt::Debug for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.red.is_some() { "BigNum-R" } else { "BigNum" };
        let sign = if self.negative { "-" } else { "" };
        write!(f, "{tag}({sign}0x{})", self.hex_digits())
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        self.negative == other.negative && self.limbs == other.limbs
    }
}

impl Eq for BigNum {}

impl Hash for BigNum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.negative.hash(state);
        self.limbs.hash(state);
    }
}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.ucmp(other),
            // Both negative: larger absolute value is smaller
            (true, true) => other.ucmp(self),
        }
    }
}
