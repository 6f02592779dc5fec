#![no_main]
use bn26_bignum::BigNum;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let split = 1 + data[0] as usize % (data.len() - 1);
    let (a, b) = data[1..].split_at(split.min(data.len() - 1));
    let mut x = BigNum::from_bytes_be(a);
    let y = BigNum::from_bytes_be(b);
    if data[0] & 0x80 != 0 {
        x.ineg();
    }
    let Ok((q, r)) = x.div_rem(&y) else {
        assert!(y.is_zero());
        return;
    };
    assert_eq!(q.mul(&y).add(&r), x);
    assert!(r.ucmp(&y).is_lt());
});
