//! Exact integers, scaled decimals and boxed floats

use proptest::prelude::*;
use valuekit::prelude::*;
use valuekit::BigInt;

fn decimal(s: &str) -> Decimal {
    Decimal::parse(s).unwrap()
}

proptest! {
    #[test]
    fn radix_round_trip(x in any::<i64>(), radix in 2u32..=36) {
        let text = Long::to_string_radix(x, radix);
        prop_assert_eq!(Long::parse_radix(&text, radix).unwrap(), x);
    }

    #[test]
    fn int_radix_round_trip(x in any::<i32>(), radix in 2u32..=36) {
        prop_assert_eq!(Int::parse_radix(&Int::to_string_radix(x, radix), radix).unwrap(), x);
    }

    #[test]
    fn decimal_plus_negation_is_zero_at_same_scale(unscaled in any::<i64>(), scale in -12i32..12) {
        let a = Decimal::from_parts(BigInt::from(unscaled), scale);
        let sum = a.add(&a.negate());
        prop_assert_eq!(sum.signum(), 0);
        prop_assert_eq!(sum.scale(), a.scale());
    }

    #[test]
    fn decimal_text_round_trip(unscaled in any::<i64>(), scale in -12i32..12) {
        let a = Decimal::from_parts(BigInt::from(unscaled), scale);
        let back = Decimal::parse(&a.to_string()).unwrap();
        prop_assert!(back.equals(&a));
    }
}

#[test]
fn test_radix_out_of_range() {
    let err = Long::parse_radix("10", 37).unwrap_err();
    assert!(err.is_format());
    assert_eq!(err.to_string(), "radix 37 not in [2,36]");
}

#[test]
fn test_parse_overflow_is_format_error() {
    assert!(Long::parse("9223372036854775808").unwrap_err().is_format());
    assert_eq!(Long::parse("-9223372036854775808").unwrap(), i64::MIN);
    assert!(Long::parse_radix("12z", 16).is_err());
}

#[test]
fn test_long_wraps_and_hashes_halves() {
    assert_eq!(Long::MAX_VALUE.add(Long(1)), Long::MIN_VALUE);
    assert_eq!(Long(1 << 32).hash_code(), 1);
    assert_eq!(Long(-1).hash_code(), 0);
}

#[test]
fn test_integer_division_by_zero() {
    assert!(Long(1).divide(Long(0)).unwrap_err().is_arithmetic());
    assert_eq!(Long::MIN_VALUE.divide(Long(-1)).unwrap(), Long::MIN_VALUE);
}

#[test]
fn test_decimal_equals_versus_compare() {
    let a = decimal("1.0");
    let b = decimal("1.00");
    assert!(!a.equals(&b));
    assert_eq!(a.compare_to(&b), std::cmp::Ordering::Equal);
}

#[test]
fn test_decimal_division() {
    assert_eq!(decimal("10").divide(&decimal("4")).unwrap().to_string(), "2.5");
    let err = decimal("10").divide(&decimal("3")).unwrap_err();
    assert!(err.is_arithmetic());
    let third = decimal("10")
        .divide_with_scale_and_rounding(&decimal("3"), 4, RoundingMode::HalfUp)
        .unwrap();
    assert_eq!(third.to_string(), "3.3333");
    assert!(decimal("1").divide(&decimal("0")).unwrap_err().is_arithmetic());
}

#[test]
fn test_unnecessary_rounding_fails_when_inexact() {
    assert!(decimal("1.25")
        .set_scale_with_rounding(1, RoundingMode::Unnecessary)
        .unwrap_err()
        .is_arithmetic());
    assert_eq!(
        decimal("1.25")
            .set_scale_with_rounding(1, RoundingMode::HalfEven)
            .unwrap()
            .to_string(),
        "1.2"
    );
}

#[test]
fn test_decimal_text_forms() {
    let tiny = decimal("1E-10");
    assert_eq!(tiny.to_plain_string(), "0.0000000001");
    assert_eq!(decimal("123E+3").to_engineering_string(), "123E+3");
    assert!(Decimal::parse("1.2.3").unwrap_err().is_format());
}

#[test]
fn test_boxed_tags_participate_in_identity() {
    let as_long = Number::Long(Long(1));
    let as_double = Number::Double(Double(1.0));
    assert!(!as_long.equals(&as_double));
    assert!(Double(f64::NAN).equals(&Double(f64::NAN)));
    assert!(!Double(0.0).equals(&Double(-0.0)));
    assert_eq!(Float(1.5).type_tag(), 'f');
    assert_eq!(Double(1.5).type_tag(), 'd');
}
