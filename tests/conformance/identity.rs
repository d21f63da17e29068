//! Equality/hash consistency across value types

use proptest::prelude::*;
use valuekit::prelude::*;
use valuekit::{string_hash, IdentityKey};

fn consistent<T: Identity>(a: &T, b: &T) -> bool {
    !a.equals(b) || a.hash_code() == b.hash_code()
}

proptest! {
    #[test]
    fn equal_longs_hash_equal(x in any::<i64>()) {
        prop_assert!(consistent(&Long(x), &Long(x)));
    }

    #[test]
    fn equal_strings_hash_equal(s in ".{0,16}") {
        prop_assert!(consistent(&s, &s.clone()));
    }

    #[test]
    fn equal_doubles_hash_equal(x in any::<f64>()) {
        prop_assert!(consistent(&Double(x), &Double(x)));
    }
}

#[test]
fn test_string_hash_matches_polynomial() {
    assert_eq!(string_hash(""), 0);
    assert_eq!(string_hash("a"), 97);
    assert_eq!(string_hash("ab"), 97 * 31 + 98);
}

#[test]
fn test_decimals_equal_only_at_same_scale() {
    let a = Decimal::parse("2.50").unwrap();
    let b = Decimal::parse("2.50").unwrap();
    let c = Decimal::parse("2.5").unwrap();
    assert!(a.equals(&b));
    assert_eq!(a.hash_code(), b.hash_code());
    assert!(!a.equals(&c));
}

#[test]
fn test_identity_key_bridges_std_hashing() {
    let mut seen = std::collections::HashSet::new();
    assert!(seen.insert(IdentityKey(Decimal::parse("1.0").unwrap())));
    assert!(!seen.insert(IdentityKey(Decimal::parse("1.0").unwrap())));
    assert!(seen.insert(IdentityKey(Decimal::parse("1.00").unwrap())));
}

#[test]
fn test_collections_hash_by_content() {
    let a: List<i32> = vec![1, 2, 3].into();
    let b: List<i32> = (1..=3).collect();
    assert!(a.equals(&b));
    assert_eq!(a.hash_code(), b.hash_code());

    let s1: Set<i32> = vec![1, 2].into_iter().collect();
    let s2: Set<i32> = vec![2, 1].into_iter().collect();
    assert!(s1.equals(&s2));
    assert_eq!(s1.hash_code(), s2.hash_code());
}

#[test]
fn test_characters_order_by_code_unit() {
    let mut set: Set<Character> = Set::new();
    assert!(set.add(Character(0x41)));
    assert!(!set.add(Character::value_of(0x41)));
    assert_eq!(Character(0xD83D).compare_to(&Character(0xFF5E)), std::cmp::Ordering::Less);
    assert_eq!(
        "\u{1F600}".to_string().compare_to(&"\u{FF5E}".to_string()),
        std::cmp::Ordering::Less
    );
}
