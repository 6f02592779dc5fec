//! String, native integer and byte array output.

use std::fmt::{self, Write as _};

use bn26_types::{BnError, Endian};

use crate::bignum::{BigNum, LIMB_BITS, SAFE_INTEGER_BITS};
use crate::parse::radix_group;

impl BigNum {
    /// Format the value in the given radix (2..=36), lowercase digits.
    pub fn to_str_radix(&self, radix: u32) -> Result<String, BnError> {
        self.to_str_radix_padded(radix, 1)
    }

    /// Format the value, left-padding the digits with `0` to a multiple of `padding`.
    ///
    /// The sign is placed before the padding. A `padding` of 0 behaves like 1.
    pub fn to_str_radix_padded(&self, radix: u32, padding: usize) -> Result<String, BnError> {
        if !(2..=36).contains(&radix) {
            return Err(BnError::InvalidRadix(radix));
        }
        Ok(self.format_digits(radix, padding))
    }

    /// Hex string with even digit count, as used for JSON output.
    pub fn to_json(&self) -> String {
        self.format_digits(16, 2)
    }

    /// Convert to a native integer. Fails if the magnitude needs more than 53 bits.
    pub fn to_number(&self) -> Result<i64, BnError> {
        if self.bit_len() > SAFE_INTEGER_BITS {
            return Err(BnError::NumberOverflow);
        }
        let mag = self
            .limbs
            .iter()
            .rev()
            .fold(0i64, |acc, &l| (acc << LIMB_BITS) | l as i64);
        Ok(if self.negative { -mag } else { mag })
    }

    /// Serialize the magnitude into a new byte vector.
    ///
    /// With `length == None` the minimal length is used (one byte for zero).
    pub fn to_array(&self, endian: Endian, length: Option<usize>) -> Result<Vec<u8>, BnError> {
        let need = self.byte_len();
        let len = match length {
            Some(0) => return Err(BnError::InvalidLength),
            Some(n) => n,
            None => need.max(1),
        };
        if need > len {
            return Err(BnError::BufferTooSmall { need, got: len });
        }
        let mut out = vec![0u8; len];
        self.fill_bytes(&mut out, endian);
        Ok(out)
    }

    /// Serialize the magnitude into `out`, zero-filling unused bytes.
    pub fn write_array(&self, out: &mut [u8], endian: Endian) -> Result<(), BnError> {
        if out.is_empty() {
            return Err(BnError::InvalidLength);
        }
        let need = self.byte_len();
        if need > out.len() {
            return Err(BnError::BufferTooSmall {
                need,
                got: out.len(),
            });
        }
        self.fill_bytes(out, endian);
        Ok(())
    }

    /// Serialize the magnitude into a fixed-size array.
    pub fn to_array_like<const N: usize>(&self, endian: Endian) -> Result<[u8; N], BnError> {
        let mut out = [0u8; N];
        self.write_array(&mut out, endian)?;
        Ok(out)
    }

    /// Export as big-endian bytes of minimal length.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.byte_len().max(1)];
        self.fill_bytes(&mut out, Endian::Big);
        out
    }

    fn fill_bytes(&self, out: &mut [u8], endian: Endian) {
        out.fill(0);
        let len = out.len();
        let mut put = |pos: usize, b: u8| match endian {
            Endian::Big => out[len - 1 - pos] = b,
            Endian::Little => out[pos] = b,
        };

        let mut acc: u64 = 0;
        let mut bits = 0;
        let mut pos = 0;
        for &limb in &self.limbs {
            if pos == len {
                break;
            }
            acc |= (limb as u64) << bits;
            bits += LIMB_BITS;
            while bits >= 8 && pos < len {
                put(pos, acc as u8);
                acc >>= 8;
                bits -= 8;
                pos += 1;
            }
        }
        if bits > 0 && pos < len {
            put(pos, acc as u8);
        }
    }

    /// Lowercase hex digits of the magnitude, no sign and no prefix.
    pub(crate) fn hex_digits(&self) -> String {
        let mut chunks: Vec<u32> = Vec::with_capacity(self.limbs.len() * LIMB_BITS / 24 + 1);
        let mut acc: u64 = 0;
        let mut acc_bits = 0;
        for &limb in &self.limbs {
            acc |= (limb as u64) << acc_bits;
            acc_bits += LIMB_BITS;
            while acc_bits >= 24 {
                chunks.push((acc & 0xff_ffff) as u32);
                acc >>= 24;
                acc_bits -= 24;
            }
        }
        if acc != 0 {
            chunks.push(acc as u32);
        }
        while chunks.len() > 1 && chunks[chunks.len() - 1] == 0 {
            chunks.pop();
        }

        let mut out = String::with_capacity(chunks.len() * 6);
        let mut iter = chunks.iter().rev();
        match iter.next() {
            Some(top) => {
                let _ = write!(out, "{top:x}");
            }
            None => out.push('0'),
        }
        for chunk in iter {
            let _ = write!(out, "{chunk:06x}");
        }
        out
    }

    /// Digits of the magnitude in a non-hex radix via repeated division by the group base.
    fn radix_digits(&self, radix: u32) -> String {
        let (group_len, group_base) = radix_group(radix);
        let mut rest = self.clone_plain();
        rest.negative = false;
        let mut groups = Vec::new();
        while !rest.is_zero() {
            groups.push(rest.idivrem_limb(group_base));
        }

        let mut out = String::new();
        let mut iter = groups.iter().rev();
        match iter.next() {
            Some(&top) => out.push_str(&digits_of(top, radix)),
            None => out.push('0'),
        }
        for &group in iter {
            let digits = digits_of(group, radix);
            out.extend(std::iter::repeat('0').take(group_len - digits.len()));
            out.push_str(&digits);
        }
        out
    }

    fn format_digits(&self, radix: u32, padding: usize) -> String {
        let digits = if radix == 16 {
            self.hex_digits()
        } else {
            self.radix_digits(radix)
        };
        let padding = padding.max(1);
        let fill = (padding - digits.len() % padding) % padding;
        let mut out = String::with_capacity(digits.len() + fill + 1);
        if self.negative {
            out.push('-');
        }
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(&digits);
        out
    }
}

/// Digits of a single limb-sized value.
fn digits_of(mut value: u32, radix: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut rev = Vec::new();
    while value != 0 {
        rev.push(char::from_digit(value % radix, radix).unwrap_or('0'));
        value /= radix;
    }
    rev.iter().rev().collect()
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.negative, "", &self.radix_digits(10))
    }
}

impl fmt::LowerHex for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.negative, "0x", &self.hex_digits())
    }
}
