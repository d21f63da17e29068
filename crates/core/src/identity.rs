//! Identity contract and natural ordering
//!
//! Every keyed or unique container in the workspace is written against the
//! [`Identity`] trait rather than a concrete element type. The contract:
//!
//! - `equals` is reflexive, symmetric and transitive
//! - `hash_code` is stable for the lifetime of the value
//! - `a.equals(b)` implies `a.hash_code() == b.hash_code()`
//!
//! Containers bucket elements by `hash_code` and disambiguate with `equals`.
//!
//! [`Comparable`] is the separate natural-ordering capability. It is allowed
//! to disagree with `equals`: two decimals `1.0` and `1.00` compare as equal
//! but are not `equals`.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Equality plus a 32-bit hash consistent with it.
pub trait Identity {
    /// Value equality
    fn equals(&self, other: &Self) -> bool;

    /// Hash consistent with [`Identity::equals`]
    fn hash_code(&self) -> i32;
}

/// Natural ordering of a value type.
pub trait Comparable {
    /// Compare `self` with `other` by natural order
    fn compare_to(&self, other: &Self) -> Ordering;
}

/// Hash of a string as 31-polynomial over its UTF-16 code units.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Fold element hashes in encounter order (`31 * h + e`, starting from 1).
pub fn ordered_hash<'a, T: Identity + 'a>(items: impl IntoIterator<Item = &'a T>) -> i32 {
    items
        .into_iter()
        .fold(1i32, |h, e| h.wrapping_mul(31).wrapping_add(e.hash_code()))
}

/// Adapts an [`Identity`] value to `Hash + Eq` for std and hashbrown containers.
#[derive(Debug, Clone)]
pub struct IdentityKey<T>(pub T);

impl<T> IdentityKey<T> {
    /// Unwrap the key
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Identity> PartialEq for IdentityKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.equals(&other.0)
    }
}

impl<T: Identity> Eq for IdentityKey<T> {}

impl<T: Identity> Hash for IdentityKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.0.hash_code());
    }
}

// ============================================================================
// Primitive implementations
// ============================================================================

impl Identity for bool {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        if *self {
            1231
        } else {
            1237
        }
    }
}

impl Identity for char {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        *self as i32
    }
}

macro_rules! narrow_int_identity {
    ($($t:ty),*) => {
        $(
            impl Identity for $t {
                fn equals(&self, other: &Self) -> bool {
                    self == other
                }

                fn hash_code(&self) -> i32 {
                    *self as i32
                }
            }
        )*
    };
}

narrow_int_identity!(i8, i16, i32, u8, u16);

impl Identity for i64 {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        (*self ^ ((*self as u64) >> 32) as i64) as i32
    }
}

impl Identity for usize {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        (*self as i64).hash_code()
    }
}

impl Identity for f32 {
    /// Bit-pattern equality: `NaN` equals `NaN`, `0.0` differs from `-0.0`
    fn equals(&self, other: &Self) -> bool {
        canonical_f32_bits(*self) == canonical_f32_bits(*other)
    }

    fn hash_code(&self) -> i32 {
        canonical_f32_bits(*self) as i32
    }
}

impl Identity for f64 {
    /// Bit-pattern equality: `NaN` equals `NaN`, `0.0` differs from `-0.0`
    fn equals(&self, other: &Self) -> bool {
        canonical_f64_bits(*self) == canonical_f64_bits(*other)
    }

    fn hash_code(&self) -> i32 {
        let bits = canonical_f64_bits(*self);
        (bits ^ (bits >> 32)) as i32
    }
}

/// Bits of an `f32` with every NaN collapsed to the canonical quiet NaN.
pub fn canonical_f32_bits(v: f32) -> u32 {
    if v.is_nan() {
        0x7fc0_0000
    } else {
        v.to_bits()
    }
}

/// Bits of an `f64` with every NaN collapsed to the canonical quiet NaN.
pub fn canonical_f64_bits(v: f64) -> u64 {
    if v.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        v.to_bits()
    }
}

impl Identity for str {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        string_hash(self)
    }
}

impl Identity for String {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        string_hash(self)
    }
}

impl<T: Identity + ?Sized> Identity for &T {
    fn equals(&self, other: &Self) -> bool {
        (**self).equals(*other)
    }

    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }
}

impl<T: Identity + ?Sized> Identity for Box<T> {
    fn equals(&self, other: &Self) -> bool {
        (**self).equals(&**other)
    }

    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }
}

impl<T: Identity + ?Sized> Identity for std::rc::Rc<T> {
    fn equals(&self, other: &Self) -> bool {
        (**self).equals(&**other)
    }

    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }
}

/// `None` plays the role of the null reference: equal only to itself, hash 0.
impl<T: Identity> Identity for Option<T> {
    fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.equals(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn hash_code(&self) -> i32 {
        self.as_ref().map_or(0, Identity::hash_code)
    }
}

/// Pairs hash like a map entry: `hash(a) ^ hash(b)`.
impl<A: Identity, B: Identity> Identity for (A, B) {
    fn equals(&self, other: &Self) -> bool {
        self.0.equals(&other.0) && self.1.equals(&other.1)
    }

    fn hash_code(&self) -> i32 {
        self.0.hash_code() ^ self.1.hash_code()
    }
}

impl<T: Identity> Identity for Vec<T> {
    fn equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.equals(b))
    }

    fn hash_code(&self) -> i32 {
        ordered_hash(self)
    }
}

// ============================================================================
// Natural ordering
// ============================================================================

macro_rules! ord_comparable {
    ($($t:ty),*) => {
        $(
            impl Comparable for $t {
                fn compare_to(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

ord_comparable!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Lexicographic over UTF-16 code units, so supplementary characters sort
/// below U+E000..U+FFFF.
pub fn compare_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

impl Comparable for str {
    fn compare_to(&self, other: &Self) -> Ordering {
        compare_utf16(self, other)
    }
}

impl Comparable for String {
    fn compare_to(&self, other: &Self) -> Ordering {
        compare_utf16(self, other)
    }
}

/// Total order: `-0.0 < 0.0`, NaN greater than everything including +∞.
impl Comparable for f32 {
    fn compare_to(&self, other: &Self) -> Ordering {
        total_order_f64(*self as f64, *other as f64)
    }
}

/// Total order: `-0.0 < 0.0`, NaN greater than everything including +∞.
impl Comparable for f64 {
    fn compare_to(&self, other: &Self) -> Ordering {
        total_order_f64(*self, *other)
    }
}

pub(crate) fn total_order_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match a.partial_cmp(&b) {
            Some(Ordering::Equal) => {
                // only -0.0 vs 0.0 reaches here with distinct bits
                a.is_sign_positive().cmp(&b.is_sign_positive())
            }
            Some(ord) => ord,
            None => Ordering::Equal,
        },
    }
}

impl<T: Comparable + ?Sized> Comparable for &T {
    fn compare_to(&self, other: &Self) -> Ordering {
        (**self).compare_to(*other)
    }
}

impl<T: Comparable + ?Sized> Comparable for Box<T> {
    fn compare_to(&self, other: &Self) -> Ordering {
        (**self).compare_to(&**other)
    }
}
