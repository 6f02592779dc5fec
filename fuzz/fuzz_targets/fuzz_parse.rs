#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&radix, rest)) = data.split_first() else {
        return;
    };
    let radix = 2 + (radix as u32 % 35);
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    if let Ok(n) = bn26_bignum::BigNum::from_str_radix(text, radix) {
        let s = n.to_str_radix(radix).unwrap();
        let back = bn26_bignum::BigNum::from_str_radix(&s, radix).unwrap();
        assert_eq!(back, n);
    }
});
