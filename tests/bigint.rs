//! Integration tests for the polymorphic big-integer layer: `Number`'s
//! variant selection and promotion, and `BignumArb`'s arithmetic at sizes
//! that cross a limb boundary.

use factorengine::bigint::{BignumArb, Number};

#[test]
fn parses_small_values_into_the_narrowest_fixed_variant() {
    let n = Number::parse_decimal("12345").unwrap();
    assert_eq!(n.to_decimal(), "12345");
}

#[test]
fn parses_values_wider_than_any_fixed_variant_into_arb() {
    let digits = "7".repeat(200);
    let n = Number::parse_decimal(&digits).unwrap();
    assert_eq!(n.to_decimal(), digits);
}

#[test]
fn rejects_empty_and_non_digit_input() {
    assert!(Number::parse_decimal("").is_err());
    assert!(Number::parse_decimal("12a45").is_err());
    assert!(Number::parse_decimal("-5").is_err());
}

#[test]
fn subtraction_shrinks_back_to_a_narrower_variant() {
    let big = Number::parse_decimal(&"9".repeat(100)).unwrap();
    let almost_as_big = Number::parse_decimal(&("9".repeat(99) + "8")).unwrap();
    let (diff, negative) = big.sub(&almost_as_big);
    assert!(!negative);
    assert_eq!(diff.to_decimal(), "1");
}

#[test]
fn multiplication_promotes_across_the_limb_boundary() {
    let a = Number::from_u64(u64::MAX);
    let b = Number::from_u64(u64::MAX);
    let product = a.mul(&b);
    let expected = (u128::from(u64::MAX)) * (u128::from(u64::MAX));
    assert_eq!(product.to_decimal(), expected.to_string());
}

#[test]
fn div_rem_round_trips_through_multiplication_and_addition() {
    let n = Number::parse_decimal("123456789012345678901234567890").unwrap();
    let d = Number::from_u64(98765);
    let (q, r) = n.div_rem(&d);
    let reconstructed = q.mul(&d).add(&r);
    assert_eq!(reconstructed, n);
}

#[test]
fn gcd_matches_euclid_on_known_values() {
    let a = BignumArb::from_u64(1071);
    let b = BignumArb::from_u64(462);
    assert_eq!(a.gcd(&b).to_decimal(), "21");
}

#[test]
fn mod_inv_round_trips_for_a_coprime_pair() {
    let a = BignumArb::from_u64(17);
    let modulus = BignumArb::from_u64(3120);
    let inv = a.mod_inv(&modulus).expect("17 is coprime to 3120");
    let product = a.mul(&inv);
    let (_, rem) = product.div_rem(&modulus);
    assert_eq!(rem.to_decimal(), "1");
}

#[test]
fn decimal_round_trips_for_a_value_spanning_several_limbs() {
    let s = "918273645918273645918273645918273645918273645";
    let n = BignumArb::from_decimal(s).unwrap();
    assert_eq!(n.to_decimal(), s);
}
