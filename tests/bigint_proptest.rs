//! Property tests cross-checking `BignumArb` arithmetic against `u128` as a
//! reference implementation, for inputs narrow enough that both fit.

use factorengine::bigint::BignumArb;
use proptest::prelude::*;

fn from_u64_pair(hi: u64, lo: u64) -> (BignumArb, u128) {
    let value = (u128::from(hi) << 64) | u128::from(lo);
    (BignumArb::from_limbs(vec![lo, hi]), value)
}

proptest! {
    #[test]
    fn add_matches_u128(a_hi in any::<u64>(), a_lo in any::<u64>(), b_hi in any::<u64>(), b_lo in any::<u64>()) {
        let (a, a_ref) = from_u64_pair(a_hi, a_lo);
        let (b, b_ref) = from_u64_pair(b_hi, b_lo);

        let (sum_ref, overflowed) = a_ref.overflowing_add(b_ref);
        prop_assume!(!overflowed);

        let sum = a.add(&b);
        prop_assert_eq!(sum.to_decimal(), sum_ref.to_string());
    }

    #[test]
    fn sub_matches_u128(a_hi in any::<u64>(), a_lo in any::<u64>(), b_hi in any::<u64>(), b_lo in any::<u64>()) {
        let (a, a_ref) = from_u64_pair(a_hi, a_lo);
        let (b, b_ref) = from_u64_pair(b_hi, b_lo);

        let (diff, negative) = a.sub(&b);
        if a_ref >= b_ref {
            prop_assert!(!negative);
            prop_assert_eq!(diff.to_decimal(), (a_ref - b_ref).to_string());
        } else {
            prop_assert!(negative);
            prop_assert_eq!(diff.to_decimal(), (b_ref - a_ref).to_string());
        }
    }

    #[test]
    fn mul_matches_u128(a in any::<u64>(), b in any::<u64>()) {
        let lhs = BignumArb::from_u64(a);
        let rhs = BignumArb::from_u64(b);

        let product = lhs.mul(&rhs);
        let expected = u128::from(a) * u128::from(b);

        prop_assert_eq!(product.to_decimal(), expected.to_string());
    }

    #[test]
    fn div_rem_matches_u128(a_hi in any::<u64>(), a_lo in any::<u64>(), divisor in any::<u64>()) {
        prop_assume!(divisor != 0);

        let (dividend, dividend_ref) = from_u64_pair(a_hi, a_lo);
        let d = BignumArb::from_u64(divisor);

        let (q, r) = dividend.div_rem(&d);
        let expected_q = dividend_ref / u128::from(divisor);
        let expected_r = dividend_ref % u128::from(divisor);

        prop_assert_eq!(q.to_decimal(), expected_q.to_string());
        prop_assert_eq!(r.to_decimal(), expected_r.to_string());
    }

    #[test]
    fn decimal_round_trips(hi in any::<u64>(), lo in any::<u64>()) {
        let (value, reference) = from_u64_pair(hi, lo);
        let decimal = value.to_decimal();

        prop_assert_eq!(&decimal, &reference.to_string());
        prop_assert_eq!(BignumArb::from_decimal(&decimal).unwrap().to_decimal(), decimal);
    }
}
