//! Bitwise operations and shifts.

use bn26_types::BnError;

use crate::bignum::{BigNum, Limb, LIMB_BITS, LIMB_MASK};

fn ensure_non_negative(values: &[&BigNum]) -> Result<(), BnError> {
    if values.iter().any(|v| v.negative) {
        return Err(BnError::NegativeOperand);
    }
    Ok(())
}

impl BigNum {
    /// In-place OR of magnitudes.
    pub fn iuor(&mut self, num: &BigNum) -> &mut Self {
        self.expand(num.limbs.len());
        for (a, &b) in self.limbs.iter_mut().zip(&num.limbs) {
            *a |= b;
        }
        self.strip()
    }

    /// In-place AND of magnitudes.
    pub fn iuand(&mut self, num: &BigNum) -> &mut Self {
        self.limbs.truncate(num.limbs.len());
        for (a, &b) in self.limbs.iter_mut().zip(&num.limbs) {
            *a &= b;
        }
        self.strip()
    }

    /// In-place XOR of magnitudes.
    pub fn iuxor(&mut self, num: &BigNum) -> &mut Self {
        self.expand(num.limbs.len());
        for (a, &b) in self.limbs.iter_mut().zip(&num.limbs) {
            *a ^= b;
        }
        self.strip()
    }

    /// Bitwise OR of the magnitudes.
    pub fn uor(&self, num: &BigNum) -> BigNum {
        let mut r = self.clone();
        r.iuor(num);
        r
    }

    /// Bitwise AND of the magnitudes.
    pub fn uand(&self, num: &BigNum) -> BigNum {
        let mut r = self.clone();
        r.iuand(num);
        r
    }

    /// Bitwise XOR of the magnitudes.
    pub fn uxor(&self, num: &BigNum) -> BigNum {
        let mut r = self.clone();
        r.iuxor(num);
        r
    }

    /// In-place OR. Both operands must be non-negative.
    pub fn ior(&mut self, num: &BigNum) -> Result<&mut Self, BnError> {
        ensure_non_negative(&[&*self, num])?;
        Ok(self.iuor(num))
    }

    /// In-place AND. Both operands must be non-negative.
    pub fn iand(&mut self, num: &BigNum) -> Result<&mut Self, BnError> {
        ensure_non_negative(&[&*self, num])?;
        Ok(self.iuand(num))
    }

    /// In-place XOR. Both operands must be non-negative.
    pub fn ixor(&mut self, num: &BigNum) -> Result<&mut Self, BnError> {
        ensure_non_negative(&[&*self, num])?;
        Ok(self.iuxor(num))
    }

    /// Bitwise OR. Both operands must be non-negative.
    pub fn or(&self, num: &BigNum) -> Result<BigNum, BnError> {
        ensure_non_negative(&[self, num])?;
        Ok(self.uor(num))
    }

    /// Bitwise AND. Both operands must be non-negative.
    pub fn and(&self, num: &BigNum) -> Result<BigNum, BnError> {
        ensure_non_negative(&[self, num])?;
        Ok(self.uand(num))
    }

    /// Bitwise XOR. Both operands must be non-negative.
    pub fn xor(&self, num: &BigNum) -> Result<BigNum, BnError> {
        ensure_non_negative(&[self, num])?;
        Ok(self.uxor(num))
    }

    /// Flip the low `width` bits of the magnitude in place.
    pub fn inotn(&mut self, width: usize) -> &mut Self {
        let limbs_needed = width.div_ceil(LIMB_BITS);
        let bits_left = width % LIMB_BITS;
        self.expand(limbs_needed);

        let full = if bits_left > 0 {
            limbs_needed - 1
        } else {
            limbs_needed
        };
        for limb in &mut self.limbs[..full] {
            *limb = !*limb & LIMB_MASK;
        }
        if bits_left > 0 {
            self.limbs[full] = !self.limbs[full] & (LIMB_MASK >> (LIMB_BITS - bits_left));
        }
        self.strip()
    }

    /// Invert the low `width` bits of the magnitude.
    pub fn notn(&self, width: usize) -> BigNum {
        let mut r = self.clone();
        r.inotn(width);
        r
    }

    /// Shift the magnitude left by `bits` in place, keeping the sign.
    pub fn iushln(&mut self, bits: usize) -> &mut Self {
        let r = bits % LIMB_BITS;
        let s = bits / LIMB_BITS;
        if r != 0 {
            let mut carry = 0;
            for limb in self.limbs.iter_mut() {
                let next = *limb >> (LIMB_BITS - r);
                *limb = ((*limb << r) & LIMB_MASK) | carry;
                carry = next;
            }
            if carry != 0 {
                self.limbs.push(carry);
            }
        }
        if s != 0 && !self.is_zero() {
            self.limbs.splice(0..0, std::iter::repeat(0).take(s));
        }
        self.strip()
    }

    /// Shift the magnitude right by `bits` in place, keeping the sign.
    pub fn iushrn(&mut self, bits: usize) -> &mut Self {
        self.shift_right(bits, None)
    }

    /// Shift right by `bits`, storing the shifted-out low bits in `extended`.
    pub fn iushrn_ext(&mut self, bits: usize, extended: &mut BigNum) -> &mut Self {
        self.shift_right(bits, Some(extended))
    }

    fn shift_right(&mut self, bits: usize, mut extended: Option<&mut BigNum>) -> &mut Self {
        let r = bits % LIMB_BITS;
        let s = (bits / LIMB_BITS).min(self.limbs.len());
        let mask: Limb = (1 << r) - 1;

        if let Some(ext) = extended.as_deref_mut() {
            ext.limbs.clear();
            ext.limbs.extend_from_slice(&self.limbs[..s]);
            ext.negative = false;
        }

        if s == self.limbs.len() {
            self.limbs.clear();
            self.limbs.push(0);
        } else {
            self.limbs.drain(..s);
        }

        let mut carry: Limb = 0;
        for limb in self.limbs.iter_mut().rev() {
            let word = *limb;
            *limb = (carry << (LIMB_BITS - r)) | (word >> r);
            carry = word & mask;
        }

        if let Some(ext) = extended {
            if carry != 0 {
                ext.limbs.push(carry);
            }
            ext.strip();
        }
        self.strip()
    }

    /// Shift the magnitude left by `bits`.
    pub fn ushln(&self, bits: usize) -> BigNum {
        let mut r = self.clone();
        r.iushln(bits);
        r
    }

    /// Shift the magnitude right by `bits`, discarding the low bits.
    pub fn ushrn(&self, bits: usize) -> BigNum {
        let mut r = self.clone();
        r.iushrn(bits);
        r
    }

    /// Shift left in place. The value must be non-negative.
    pub fn ishln(&mut self, bits: usize) -> Result<&mut Self, BnError> {
        ensure_non_negative(&[&*self])?;
        Ok(self.iushln(bits))
    }

    /// Shift right in place. The value must be non-negative.
    pub fn ishrn(&mut self, bits: usize) -> Result<&mut Self, BnError> {
        ensure_non_negative(&[&*self])?;
        Ok(self.iushrn(bits))
    }

    /// Shift left by `bits`. The value must be non-negative.
    pub fn shln(&self, bits: usize) -> Result<BigNum, BnError> {
        ensure_non_negative(&[self])?;
        Ok(self.ushln(bits))
    }

    /// Shift right by `bits`. The value must be non-negative.
    pub fn shrn(&self, bits: usize) -> Result<BigNum, BnError> {
        ensure_non_negative(&[self])?;
        Ok(self.ushrn(bits))
    }

    /// Test whether bit `bit` of the magnitude is set.
    pub fn testn(&self, bit: usize) -> bool {
        let (idx, off) = (bit / LIMB_BITS, bit % LIMB_BITS);
        (self.limb(idx) >> off) & 1 == 1
    }

    /// Set or clear bit `bit` of the magnitude.
    pub fn setn(&mut self, bit: usize, val: bool) -> &mut Self {
        let (idx, off) = (bit / LIMB_BITS, bit % LIMB_BITS);
        self.expand(idx + 1);
        if val {
            self.limbs[idx] |= 1 << off;
        } else {
            self.limbs[idx] &= !(1 << off);
        }
        self.strip()
    }

    /// Keep only the low `bits` bits of the magnitude. The sign is unchanged.
    pub fn imaskn(&mut self, bits: usize) -> &mut Self {
        let r = bits % LIMB_BITS;
        let s = bits.div_ceil(LIMB_BITS);
        if s == 0 {
            self.set_zero();
            return self;
        }
        self.limbs.truncate(s);
        if r != 0 && self.limbs.len() == s {
            self.limbs[s - 1] &= LIMB_MASK >> (LIMB_BITS - r);
        }
        self.strip()
    }

    /// Keep only the low `bits` bits, preserving the sign.
    pub fn maskn(&self, bits: usize) -> BigNum {
        let mut r = self.clone();
        r.imaskn(bits);
        r
    }

    /// Add `2^bit` to the magnitude.
    pub fn bincn(&mut self, bit: usize) -> &mut Self {
        let (idx, off) = (bit / LIMB_BITS, bit % LIMB_BITS);
        self.expand(idx + 1);
        let mut carry: Limb = 1 << off;
        for limb in &mut self.limbs[idx..] {
            if carry == 0 {
                break;
            }
            let w = *limb + carry;
            *limb = w & LIMB_MASK;
            carry = w >> LIMB_BITS;
        }
        if carry != 0 {
            self.limbs.push(carry);
        }
        self.strip()
    }

    /// AND the lowest limb with `mask`.
    pub fn andln(&self, mask: Limb) -> Limb {
        self.limbs[0] & mask
    }

    /// Number of trailing zero bits (zero for the value zero).
    pub fn zero_bits(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        let mut bits = 0;
        for &limb in &self.limbs {
            if limb != 0 {
                return bits + limb.trailing_zeros() as usize;
            }
            bits += LIMB_BITS;
        }
        bits
    }

    /// Two's complement encoding in `width` bits of a possibly negative value.
    pub fn to_twos(&self, width: usize) -> BigNum {
        if !self.negative {
            return self.clone();
        }
        let mut r = self.abs();
        r.inotn(width);
        r.iaddn(1);
        r
    }

    /// Decode a `width`-bit two's complement value.
    pub fn from_twos(&self, width: usize) -> BigNum {
        if width == 0 || !self.testn(width - 1) {
            return self.clone();
        }
        let mut r = self.notn(width);
        r.iaddn(1);
        r.ineg();
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> BigNum {
        BigNum::from_str_radix(s, 16).unwrap()
    }

    #[test]
    fn test_bitwise_extends_shorter() {
        let a = hex("ff00000000000000ff");
        let b = hex("0f0f");
        assert_eq!(a.or(&b).unwrap(), hex("ff0000000000000fff"));
        assert_eq!(a.and(&b).unwrap(), hex("0f"));
        assert_eq!(a.xor(&b).unwrap(), hex("ff0000000000000ff0"));
        assert_eq!(b.uand(&a), hex("0f"));
    }

    #[test]
    fn test_signed_bitwise_rejects_negative() {
        let a = BigNum::from_i64(-3);
        let b = BigNum::from_u64(1);
        assert_eq!(a.or(&b), Err(BnError::NegativeOperand));
        assert_eq!(b.clone().iand(&a).err(), Some(BnError::NegativeOperand));
        assert_eq!(a.uor(&b), BigNum::from_i64(-3));
    }

    #[test]
    fn test_shift_roundtrip() {
        let a = hex("123456789abcdef0123456789");
        for bits in [1, 25, 26, 27, 52, 100] {
            let shifted = a.ushln(bits);
            assert_eq!(shifted.bit_len(), a.bit_len() + bits);
            assert_eq!(shifted.ushrn(bits), a);
        }
    }

    #[test]
    fn test_shift_keeps_sign() {
        let a = BigNum::from_i64(-40);
        assert_eq!(a.ushrn(3), BigNum::from_i64(-5));
        assert_eq!(a.ushln(1), BigNum::from_i64(-80));
        assert_eq!(a.shln(1), Err(BnError::NegativeOperand));
        assert_eq!(BigNum::from_i64(-1).ushrn(1), BigNum::zero());
    }

    #[test]
    fn test_shift_right_past_end() {
        let mut a = hex("ffffffffffff");
        a.iushrn(500);
        assert!(a.is_zero());
    }

    #[test]
    fn test_iushrn_ext_collects_low_bits() {
        let mut a = hex("123456789abcdef");
        let mut low = BigNum::zero();
        a.iushrn_ext(30, &mut low);
        assert_eq!(a, hex("123456789abcdef").ushrn(30));
        assert_eq!(low, hex("123456789abcdef").maskn(30));
    }

    #[test]
    fn test_testn_setn() {
        let mut a = BigNum::zero();
        a.setn(60, true);
        assert!(a.testn(60));
        assert!(!a.testn(59));
        assert_eq!(a, BigNum::from_u64(1 << 60));
        a.setn(60, false);
        assert!(a.is_zero());
        assert!(!a.testn(1000));
    }

    #[test]
    fn test_notn() {
        assert_eq!(BigNum::from_u64(0b1010).notn(4), BigNum::from_u64(0b0101));
        assert_eq!(BigNum::zero().notn(30), BigNum::from_u64((1 << 30) - 1));
        assert_eq!(BigNum::zero().notn(52), BigNum::from_u64((1 << 52) - 1));
    }

    #[test]
    fn test_maskn() {
        let a = hex("ffffffffffffffff");
        assert_eq!(a.maskn(8), BigNum::from_u64(0xff));
        assert_eq!(a.maskn(26), BigNum::from_u64(LIMB_MASK as u64));
        assert_eq!(a.maskn(100), a);
        assert!(a.maskn(0).is_zero());
    }

    #[test]
    fn test_bincn_carries() {
        let mut a = BigNum::from_u64((1 << 52) - 1);
        a.bincn(0);
        assert_eq!(a, BigNum::from_u64(1 << 52));
        let mut z = BigNum::zero();
        z.bincn(70);
        assert_eq!(z.bit_len(), 71);
    }

    #[test]
    fn test_zero_bits_and_andln() {
        assert_eq!(BigNum::from_u64(1 << 40).zero_bits(), 40);
        assert_eq!(BigNum::zero().zero_bits(), 0);
        assert_eq!(BigNum::from_u64(0x1234).andln(0xff), 0x34);
    }

    #[test]
    fn test_twos_complement() {
        let n = BigNum::from_i64(-1);
        assert_eq!(n.to_twos(8), BigNum::from_u64(0xff));
        assert_eq!(BigNum::from_u64(0xff).from_twos(8), n);
        let n = BigNum::from_i64(-129);
        assert_eq!(n.to_twos(16), BigNum::from_u64(0xff7f));
        assert_eq!(BigNum::from_u64(0xff7f).from_twos(16), n);
        assert_eq!(BigNum::from_u64(0x7f).from_twos(8), BigNum::from_u64(0x7f));
    }
}
