//! Construction of big numbers from strings and byte arrays.

use std::str::FromStr;

use bn26_types::{BnError, Endian};

use crate::bignum::{BigNum, Limb, LIMB_BITS, LIMB_MASK};

/// Largest power of `radix` that fits in one limb, with the number of digits it spans.
pub(crate) fn radix_group(radix: u32) -> (usize, Limb) {
    let mut size = 0;
    let mut base: u64 = 1;
    while base * radix as u64 <= LIMB_MASK as u64 {
        base *= radix as u64;
        size += 1;
    }
    (size, base as Limb)
}

/// Value of a group of ASCII digits already validated against `radix`.
fn parse_group(digits: &[u8], radix: u32) -> Limb {
    digits.iter().fold(0, |acc, &b| {
        acc * radix + (b as char).to_digit(radix).unwrap_or(0)
    })
}

/// Radix 16: six digits (24 bits) at a time from the least significant end.
fn parse_hex(digits: &[u8]) -> BigNum {
    pack_words(
        digits.rchunks(6).map(|c| parse_group(c, 16)),
        digits.len().div_ceil(6),
    )
}

/// Generic radix: multiply by the group power, then add the group value.
fn parse_base(digits: &[u8], radix: u32) -> BigNum {
    let (group_len, group_pow) = radix_group(radix);
    let tail = digits.len() % group_len;
    let (head, rest) = digits.split_at(digits.len() - tail);

    let mut bn = BigNum::zero();
    for group in head.chunks(group_len) {
        bn.imul_limb(group_pow);
        bn.iadd_limb(parse_group(group, radix));
    }
    if !rest.is_empty() {
        bn.imul_limb(radix.pow(rest.len() as u32));
        bn.iadd_limb(parse_group(rest, radix));
    }
    bn
}

/// Pack 24-bit words, least significant first, into 26-bit limbs with a running bit offset.
fn pack_words(words: impl Iterator<Item = Limb>, count: usize) -> BigNum {
    let mut limbs = vec![0 as Limb; count + 1];
    let mut off = 0;
    let mut j = 0;
    for w in words {
        limbs[j] |= (w << off) & LIMB_MASK;
        limbs[j + 1] |= w >> (LIMB_BITS - off);
        off += 24;
        if off >= LIMB_BITS {
            off -= LIMB_BITS;
            j += 1;
        }
    }
    BigNum::from_limbs(limbs)
}

impl BigNum {
    /// Parse a string in the given radix (2..=36).
    ///
    /// Whitespace anywhere in the input is ignored, a leading `-` makes the
    /// value negative and radix 16 accepts an optional `0x` prefix.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, BnError> {
        if !(2..=36).contains(&radix) {
            return Err(BnError::InvalidRadix(radix));
        }
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (negative, unsigned) = match compact.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, compact.as_str()),
        };
        let digits = if radix == 16 {
            unsigned
                .strip_prefix("0x")
                .or_else(|| unsigned.strip_prefix("0X"))
                .unwrap_or(unsigned)
        } else {
            unsigned
        };
        if digits.is_empty() {
            return Err(BnError::EmptyInput);
        }
        if let Some(ch) = digits.chars().find(|c| !c.is_digit(radix)) {
            return Err(BnError::InvalidDigit { ch, radix });
        }

        let mut bn = if radix == 16 {
            parse_hex(digits.as_bytes())
        } else {
            parse_base(digits.as_bytes(), radix)
        };
        bn.negative = negative;
        bn.strip();
        Ok(bn)
    }

    /// Parse a string and interpret the resulting magnitude bytes with `endian` order.
    ///
    /// With [`Endian::Little`] the big-endian byte encoding of the parsed
    /// magnitude is read back as little-endian. The sign is kept.
    pub fn from_str_radix_endian(s: &str, radix: u32, endian: Endian) -> Result<Self, BnError> {
        let bn = Self::from_str_radix(s, radix)?;
        match endian {
            Endian::Big => Ok(bn),
            Endian::Little => {
                let bytes = bn.to_array(Endian::Big, None)?;
                let mut out = Self::from_bytes(&bytes, Endian::Little);
                out.negative = bn.negative;
                out.strip();
                Ok(out)
            }
        }
    }

    /// Create a non-negative BigNum from bytes in the given order.
    pub fn from_bytes(bytes: &[u8], endian: Endian) -> Self {
        if bytes.is_empty() {
            return Self::zero();
        }
        let count = bytes.len().div_ceil(3);
        match endian {
            Endian::Big => pack_words(
                bytes
                    .rchunks(3)
                    .map(|c| c.iter().fold(0, |acc, &b| (acc << 8) | b as Limb)),
                count,
            ),
            Endian::Little => pack_words(
                bytes
                    .chunks(3)
                    .map(|c| c.iter().rev().fold(0, |acc, &b| (acc << 8) | b as Limb)),
                count,
            ),
        }
    }

    /// Create a BigNum from big-endian bytes.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes, Endian::Big)
    }

    /// Create a BigNum from little-endian bytes.
    pub fn from_bytes_le(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes, Endian::Little)
    }
}

impl FromStr for BigNum {
    type Err = BnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(s, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix_group() {
        assert_eq!(radix_group(2), (25, 1 << 25));
        assert_eq!(radix_group(10), (7, 10_000_000));
        assert_eq!(radix_group(16), (6, 1 << 24));
        assert_eq!(radix_group(36), (5, 60_466_176));
    }

    #[test]
    fn test_parse_decimal() {
        let n = BigNum::from_str_radix("1000", 10).unwrap();
        assert_eq!(n, BigNum::from_u64(1000));
        let n: BigNum = "121932631112635269".parse().unwrap();
        assert_eq!(n, BigNum::from_u64(121_932_631_112_635_269));
    }

    #[test]
    fn test_parse_hex_across_limbs() {
        let n = BigNum::from_str_radix("0123456789abcdef", 16).unwrap();
        assert_eq!(n, BigNum::from_u64(0x0123_4567_89ab_cdef));
        let n = BigNum::from_str_radix("0xFFFFFFFFFFFFFFFF", 16).unwrap();
        assert_eq!(n, BigNum::from_u64(u64::MAX));
    }

    #[test]
    fn test_parse_negative_and_whitespace() {
        let n = BigNum::from_str_radix(" -12 34\n56 ", 10).unwrap();
        assert_eq!(n, BigNum::from_i64(-123456));
        let z = BigNum::from_str_radix("-0", 10).unwrap();
        assert!(z.is_zero());
        assert!(!z.is_negative());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(BigNum::from_str_radix("12", 1), Err(BnError::InvalidRadix(1)));
        assert_eq!(BigNum::from_str_radix("12", 37), Err(BnError::InvalidRadix(37)));
        assert_eq!(BigNum::from_str_radix("", 10), Err(BnError::EmptyInput));
        assert_eq!(BigNum::from_str_radix("-", 10), Err(BnError::EmptyInput));
        assert_eq!(
            BigNum::from_str_radix("12a", 10),
            Err(BnError::InvalidDigit { ch: 'a', radix: 10 })
        );
        assert_eq!(
            BigNum::from_str_radix("z", 16),
            Err(BnError::InvalidDigit { ch: 'z', radix: 16 })
        );
    }

    #[test]
    fn test_parse_radix_36_and_2() {
        let n = BigNum::from_str_radix("zz", 36).unwrap();
        assert_eq!(n, BigNum::from_u64(35 * 36 + 35));
        let bits = "1".repeat(70);
        let n = BigNum::from_str_radix(&bits, 2).unwrap();
        assert_eq!(n.bit_len(), 70);
        assert_eq!(n.num_limbs(), 3);
    }

    #[test]
    fn test_from_bytes_endian() {
        let be = BigNum::from_bytes(&[0x01, 0x02, 0x03, 0x04], Endian::Big);
        assert_eq!(be, BigNum::from_u64(0x0102_0304));
        let le = BigNum::from_bytes(&[0x01, 0x02, 0x03, 0x04], Endian::Little);
        assert_eq!(le, BigNum::from_u64(0x0403_0201));
        assert!(BigNum::from_bytes(&[], Endian::Big).is_zero());
        assert!(BigNum::from_bytes(&[0, 0, 0, 0], Endian::Little).is_zero());
    }

    #[test]
    fn test_from_bytes_long() {
        let bytes: Vec<u8> = (1..=20).collect();
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let a = BigNum::from_bytes_be(&bytes);
        let b = BigNum::from_str_radix(&hex, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_str_radix_little_endian() {
        let n = BigNum::from_str_radix_endian("010203", 16, Endian::Little).unwrap();
        assert_eq!(n, BigNum::from_u64(0x030201));
    }
}
