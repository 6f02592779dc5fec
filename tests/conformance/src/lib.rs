//! Conformance tests for bn26.
//! Worked examples plus property checks across parsing, arithmetic and reduction.

#[cfg(test)]
mod tests {
    use bn26_bignum::{BigNum, DivMode, Endian, MulStrategy, ReductionContext};
    use proptest::prelude::*;

    fn dec(s: &str) -> BigNum {
        BigNum::from_str_radix(s, 10).unwrap()
    }

    fn hex(s: &str) -> BigNum {
        BigNum::from_str_radix(s, 16).unwrap()
    }

    // -------------------------------------------------------
    // 1. Worked examples
    // -------------------------------------------------------
    #[test]
    fn test_parse_and_format() {
        let n = dec("1000");
        assert_eq!(n.limbs(), &[1000]);
        assert_eq!(n.to_str_radix(16).unwrap(), "3e8");
        assert_eq!(n.to_string(), "1000");
        assert_eq!(format!("{n:x}"), "3e8");
    }

    #[test]
    fn test_signed_add() {
        let r = BigNum::from_i64(-5).add(&BigNum::from_i64(3));
        assert_eq!(r, BigNum::from_i64(-2));
    }

    #[test]
    fn test_mul_past_53_bits() {
        let r = BigNum::from_u64(123456789).mul(&BigNum::from_u64(987654321));
        assert_eq!(r.to_string(), "121932631112635269");
        assert_eq!(r, dec("121932631112635269"));
    }

    #[test]
    fn test_mod_and_umod() {
        assert_eq!(BigNum::from_u64(17).rem(&BigNum::from_u64(5)).unwrap(), BigNum::from_u64(2));
        assert_eq!(BigNum::from_i64(-17).rem(&BigNum::from_u64(5)).unwrap(), BigNum::from_i64(-2));
        assert_eq!(BigNum::from_i64(-17).umod(&BigNum::from_u64(5)).unwrap(), BigNum::from_u64(3));
    }

    #[test]
    fn test_invm_small() {
        let r = BigNum::from_u64(3).invm(&BigNum::from_u64(11)).unwrap();
        assert_eq!(r, BigNum::from_u64(4));
    }

    #[test]
    fn test_byte_array_roundtrip() {
        let n = BigNum::from_bytes(&[1, 0, 0], Endian::Big);
        assert_eq!(n, BigNum::from_u64(0x10000));
        assert_eq!(n.to_array(Endian::Big, Some(3)).unwrap(), vec![1, 0, 0]);
        assert_eq!(n.to_array(Endian::Little, Some(4)).unwrap(), vec![0, 0, 1, 0]);
    }

    // -------------------------------------------------------
    // 2. Cross-module scenarios
    // -------------------------------------------------------
    #[test]
    fn test_divmod_all_modes() {
        let a = hex("-123456789abcdef0123456789abcdef");
        let b = hex("fedcba987654321");
        let both = a.divmod(&b, DivMode::Both).unwrap();
        let q = both.div.unwrap();
        let r = both.rem.unwrap();
        assert_eq!(q.mul(&b).add(&r), a);
        assert!(r.is_negative());
        assert_eq!(a.divmod(&b, DivMode::Div).unwrap().rem, None);
        assert_eq!(a.divmod(&b, DivMode::Mod).unwrap().div, None);
    }

    #[test]
    fn test_fermat_in_every_context() {
        let a = hex("b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21");
        let p224 = ReductionContext::prime("p224").unwrap();
        let modulus = p224.modulus().clone();
        let ctxs = [
            p224,
            ReductionContext::mont(&modulus).unwrap(),
            ReductionContext::new(&modulus).unwrap(),
        ];
        for ctx in &ctxs {
            let ar = a.to_red(ctx).unwrap();
            let one = ar.red_pow(&modulus.subn(1)).unwrap().from_red().unwrap();
            assert!(one.is_one());
        }
    }

    #[test]
    fn test_sqrt_on_p25519() {
        // p25519 = 5 mod 8, exercising the non-(3 mod 4) path.
        let ctx = ReductionContext::prime("p25519").unwrap();
        let x = hex("216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a");
        let xr = x.to_red(&ctx).unwrap();
        let sq = xr.red_sqr().unwrap();
        let root = sq.red_sqrt().unwrap();
        assert_eq!(root.red_sqr().unwrap(), sq);
    }

    #[test]
    fn test_gcd_and_egcd() {
        let a = dec("1071");
        let b = dec("462");
        assert_eq!(a.gcd(&b), dec("21"));
        let e = a.egcd(&b).unwrap();
        assert_eq!(a.mul(&e.a).add(&b.mul(&e.b)), e.gcd);
        assert_eq!(e.gcd, dec("21"));
    }

    // -------------------------------------------------------
    // 3. Properties
    // -------------------------------------------------------
    fn bignum() -> impl Strategy<Value = BigNum> {
        (proptest::collection::vec(any::<u8>(), 0..96), any::<bool>()).prop_map(|(bytes, neg)| {
            let n = BigNum::from_bytes_be(&bytes);
            if neg {
                n.neg()
            } else {
                n
            }
        })
    }

    fn digits(radix: u32) -> impl Strategy<Value = String> {
        (
            proptest::collection::vec(0..radix, 1..120),
            any::<bool>(),
        )
            .prop_map(move |(ds, neg)| {
                let body: String = ds
                    .iter()
                    .map(|&d| char::from_digit(d, radix).unwrap())
                    .collect();
                if neg {
                    format!("-{body}")
                } else {
                    body
                }
            })
    }

    fn normalized(s: &str) -> String {
        let (neg, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let body = body.trim_start_matches('0');
        match (body.is_empty(), neg) {
            (true, _) => "0".to_string(),
            (false, true) => format!("-{body}"),
            (false, false) => body.to_string(),
        }
    }

    proptest! {
        #[test]
        fn prop_roundtrip_radix(
            (radix, s) in prop_oneof![Just(2u32), Just(16u32), Just(36u32)]
                .prop_flat_map(|r| (Just(r), digits(r)))
        ) {
            let n = BigNum::from_str_radix(&s, radix).unwrap();
            prop_assert_eq!(n.to_str_radix(radix).unwrap(), normalized(&s));
        }

        #[test]
        fn prop_additive_inverse(x in bignum()) {
            prop_assert!(x.add(&x.neg()).is_zero());
        }

        #[test]
        fn prop_mul_associative(x in bignum(), y in bignum(), z in bignum()) {
            prop_assert_eq!(x.mul(&y).mul(&z), x.mul(&y.mul(&z)));
        }

        #[test]
        fn prop_division_law(x in bignum(), y in bignum()) {
            prop_assume!(!y.is_zero());
            let (q, r) = x.div_rem(&y).unwrap();
            prop_assert_eq!(q.mul(&y).add(&r), x.clone());
            prop_assert!(r.ucmp(&y).is_lt());

            let m = x.umod(&y).unwrap();
            prop_assert!(!m.is_negative());
            prop_assert!(m.ucmp(&y).is_lt());
            prop_assert!(x.sub(&m).rem(&y).unwrap().is_zero());
        }

        #[test]
        fn prop_strip_idempotent(x in bignum()) {
            let mut y = x.clone();
            y.strip();
            prop_assert_eq!(&y, &x);
            prop_assert_eq!(y.limbs(), x.limbs());
        }

        #[test]
        fn prop_bytes_roundtrip(x in bignum()) {
            let a = x.abs();
            let be = a.to_array(Endian::Big, None).unwrap();
            let le = a.to_array(Endian::Little, None).unwrap();
            prop_assert_eq!(BigNum::from_bytes(&be, Endian::Big), a.clone());
            prop_assert_eq!(BigNum::from_bytes(&le, Endian::Little), a);
        }

        #[test]
        fn prop_red_mul_matches_mod(x in bignum(), y in bignum()) {
            let k256 = ReductionContext::prime("k256").unwrap();
            let m = k256.modulus().clone();
            let x = x.umod(&m).unwrap();
            let y = y.umod(&m).unwrap();
            let expect = x.mul(&y).rem(&m).unwrap();
            for ctx in [k256.clone(), ReductionContext::mont(&m).unwrap()] {
                let r = x.to_red(&ctx).unwrap().red_mul(&y.to_red(&ctx).unwrap()).unwrap();
                prop_assert_eq!(r.from_red().unwrap(), expect.clone());
            }
        }

        #[test]
        fn prop_invm_correct(x in bignum()) {
            let m = ReductionContext::prime("p192").unwrap().modulus().clone();
            let x = x.umod(&m).unwrap();
            prop_assume!(!x.is_zero());
            let inv = x.invm(&m).unwrap();
            prop_assert!(x.mul(&inv).umod(&m).unwrap().is_one());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_fft_matches_schoolbook(
            a_len in 40usize..1200,
            b_len in 40usize..1200,
            seed in any::<u64>(),
        ) {
            // Deterministic fill from the seed; lengths straddle 63 and 1024 limbs.
            let fill = |len: usize, mut s: u64| {
                let bytes: Vec<u8> = (0..len * 26 / 8)
                    .map(|_| {
                        s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                        (s >> 56) as u8
                    })
                    .collect();
                BigNum::from_bytes_be(&bytes)
            };
            let a = fill(a_len, seed);
            let b = fill(b_len, seed ^ 0x9e3779b97f4a7c15);
            let school = a.mul_with(&b, MulStrategy::Schoolbook);
            prop_assert_eq!(a.mulf(&b), school.clone());
            prop_assert_eq!(a.mul(&b), school);
        }
    }
}
