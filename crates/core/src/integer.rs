//! Exact fixed-width integer value types
//!
//! `Long`, `Int`, `Short` and `Byte` are boxed two's-complement integers.
//! All arithmetic wraps modulo 2^width; nothing traps except division by zero.
//!
//! ## Text forms
//!
//! - `parse_radix` / `to_string_radix` are exact inverses for radix ∈ [2, 36]
//! - `to_hex_string`, `to_octal_string`, `to_binary_string` render the
//!   unsigned two's-complement bit pattern (no sign)
//! - `decode` accepts `0x`, `0X`, `#` (hex) and leading `0` (octal) prefixes

use crate::character::Character;
use crate::error::{Error, Result};
use crate::identity::{Comparable, Identity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Smallest radix accepted by the radix conversions
pub const MIN_RADIX: u32 = 2;
/// Largest radix accepted by the radix conversions
pub const MAX_RADIX: u32 = 36;

fn check_radix(radix: u32) -> Result<()> {
    if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
        return Err(Error::format(format!(
            "radix {} not in [{},{}]",
            radix, MIN_RADIX, MAX_RADIX
        )));
    }
    Ok(())
}

fn input_error(s: &str, radix: u32) -> Error {
    if radix == 10 {
        Error::format(format!("For input string: \"{}\"", s))
    } else {
        Error::format(format!("For input string: \"{}\" under radix {}", s, radix))
    }
}

/// Parse signed text into an `i128`, rejecting magnitudes above `max_magnitude`.
///
/// `max_magnitude` is `|MIN_VALUE|` of the target width; the caller narrows
/// the result and rejects `+|MIN_VALUE|`.
fn parse_signed(s: &str, radix: u32, max_magnitude: i128) -> Result<i128> {
    check_radix(radix)?;
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        Some(_) => (false, s),
        None => return Err(input_error(s, radix)),
    };
    if digits.is_empty() {
        return Err(input_error(s, radix));
    }

    let mut magnitude: i128 = 0;
    for c in digits.chars() {
        let digit = Character::digit(u32::from(c), radix);
        if digit < 0 {
            return Err(input_error(s, radix));
        }
        magnitude = magnitude * radix as i128 + digit as i128;
        if magnitude > max_magnitude {
            return Err(input_error(s, radix));
        }
    }
    Ok(if negative { -magnitude } else { magnitude })
}

fn digits_in_radix(negative: bool, mut magnitude: u128, radix: u32) -> String {
    if magnitude == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(66);
    while magnitude > 0 {
        let d = (magnitude % radix as u128) as u32;
        buf.push(Character::for_digit(d, radix).unwrap_or('0'));
        magnitude /= radix as u128;
    }
    if negative {
        buf.push('-');
    }
    buf.iter().rev().collect()
}

/// Split a `decode` input into (negative, radix, digits).
fn decode_prefix(s: &str) -> Result<(bool, u32, &str)> {
    if s.is_empty() {
        return Err(Error::format("Zero length string"));
    }
    let (negative, rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = if let Some(r) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, r)
    } else if let Some(r) = rest.strip_prefix('#') {
        (16, r)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };
    if digits.starts_with('-') || digits.starts_with('+') {
        return Err(Error::format("Sign character in wrong position"));
    }
    Ok((negative, radix, digits))
}

macro_rules! exact_integer {
    ($(#[$meta:meta])* $name:ident, $prim:ty, $unsigned:ty, $bits:expr) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $prim);

        impl $name {
            /// Smallest representable value
            pub const MIN_VALUE: $name = $name(<$prim>::MIN);
            /// Largest representable value
            pub const MAX_VALUE: $name = $name(<$prim>::MAX);
            /// Width in bits
            pub const SIZE: u32 = $bits;
            /// Width in bytes
            pub const BYTES: u32 = $bits / 8;

            /// Box a primitive value
            pub const fn new(value: $prim) -> Self {
                $name(value)
            }

            /// The primitive value
            pub const fn value(self) -> $prim {
                self.0
            }

            // =================================================================
            // Parsing and text
            // =================================================================

            /// Parse decimal text
            ///
            /// # Errors
            ///
            /// Returns `Error::Format` on empty text, an invalid digit, or overflow.
            pub fn parse(s: &str) -> Result<$prim> {
                Self::parse_radix(s, 10)
            }

            /// Parse text in the given radix (an optional leading `+` or `-` is allowed)
            ///
            /// # Errors
            ///
            /// Returns `Error::Format` if the radix is outside [2, 36], the text is
            /// empty, contains a character invalid for the radix, or overflows.
            pub fn parse_radix(s: &str, radix: u32) -> Result<$prim> {
                let max_magnitude = -(<$prim>::MIN as i128);
                let value = parse_signed(s, radix, max_magnitude)?;
                <$prim>::try_from(value).map_err(|_| input_error(s, radix))
            }

            /// Parse decimal text into a boxed value
            pub fn value_of(s: &str) -> Result<Self> {
                Self::parse(s).map($name)
            }

            /// Parse text in the given radix into a boxed value
            pub fn value_of_radix(s: &str, radix: u32) -> Result<Self> {
                Self::parse_radix(s, radix).map($name)
            }

            /// Parse text with an optional `0x`, `0X`, `#` or `0` radix prefix
            pub fn decode(s: &str) -> Result<Self> {
                let (negative, radix, digits) = decode_prefix(s)?;
                let signed = if negative {
                    format!("-{}", digits)
                } else {
                    digits.to_string()
                };
                Self::parse_radix(&signed, radix)
                    .map($name)
                    .map_err(|_| input_error(s, radix))
            }

            /// Render `value` in decimal
            pub fn to_string_of(value: $prim) -> String {
                Self::to_string_radix(value, 10)
            }

            /// Render `value` in `radix`, falling back to radix 10 outside [2, 36]
            pub fn to_string_radix(value: $prim, radix: u32) -> String {
                let radix = if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
                    radix
                } else {
                    10
                };
                digits_in_radix(value < 0, (value as i128).unsigned_abs(), radix)
            }

            /// Unsigned base-16 rendering of the bit pattern
            pub fn to_hex_string(value: $prim) -> String {
                format!("{:x}", value as $unsigned)
            }

            /// Unsigned base-8 rendering of the bit pattern
            pub fn to_octal_string(value: $prim) -> String {
                format!("{:o}", value as $unsigned)
            }

            /// Unsigned base-2 rendering of the bit pattern
            pub fn to_binary_string(value: $prim) -> String {
                format!("{:b}", value as $unsigned)
            }

            // =================================================================
            // Arithmetic (wrapping)
            // =================================================================

            /// Wrapping sum of two primitives
            pub const fn sum(a: $prim, b: $prim) -> $prim {
                a.wrapping_add(b)
            }

            /// Larger of two primitives
            pub fn max(a: $prim, b: $prim) -> $prim {
                std::cmp::max(a, b)
            }

            /// Smaller of two primitives
            pub fn min(a: $prim, b: $prim) -> $prim {
                std::cmp::min(a, b)
            }

            /// Signed comparison
            pub fn compare(a: $prim, b: $prim) -> Ordering {
                a.cmp(&b)
            }

            /// -1, 0 or 1
            pub const fn signum(value: $prim) -> i32 {
                value.signum() as i32
            }

            /// Wrapping addition
            pub const fn add(self, other: Self) -> Self {
                $name(self.0.wrapping_add(other.0))
            }

            /// Wrapping subtraction
            pub const fn subtract(self, other: Self) -> Self {
                $name(self.0.wrapping_sub(other.0))
            }

            /// Wrapping multiplication
            pub const fn multiply(self, other: Self) -> Self {
                $name(self.0.wrapping_mul(other.0))
            }

            /// Truncating division; `MIN_VALUE / -1` wraps to `MIN_VALUE`
            ///
            /// # Errors
            ///
            /// Returns `Error::Arithmetic` when `other` is zero.
            pub fn divide(self, other: Self) -> Result<Self> {
                if other.0 == 0 {
                    return Err(Error::arithmetic("/ by zero"));
                }
                Ok($name(self.0.wrapping_div(other.0)))
            }

            /// Remainder with the sign of the dividend
            ///
            /// # Errors
            ///
            /// Returns `Error::Arithmetic` when `other` is zero.
            pub fn remainder(self, other: Self) -> Result<Self> {
                if other.0 == 0 {
                    return Err(Error::arithmetic("/ by zero"));
                }
                Ok($name(self.0.wrapping_rem(other.0)))
            }

            /// Wrapping negation; `MIN_VALUE` negates to itself
            pub const fn negate(self) -> Self {
                $name(self.0.wrapping_neg())
            }

            // =================================================================
            // Bit operations
            // =================================================================

            /// Number of one bits in the two's-complement representation
            pub const fn bit_count(value: $prim) -> u32 {
                value.count_ones()
            }

            /// Rotate left; the distance is taken modulo the width
            pub const fn rotate_left(value: $prim, distance: i32) -> $prim {
                value.rotate_left(distance.rem_euclid($bits) as u32)
            }

            /// Rotate right; the distance is taken modulo the width
            pub const fn rotate_right(value: $prim, distance: i32) -> $prim {
                value.rotate_right(distance.rem_euclid($bits) as u32)
            }

            /// Value with only the highest one bit of `value` set (0 for 0)
            pub const fn highest_one_bit(value: $prim) -> $prim {
                let bits = value as $unsigned;
                if bits == 0 {
                    0
                } else {
                    ((1 as $unsigned) << ($bits - 1 - bits.leading_zeros())) as $prim
                }
            }

            /// Value with only the lowest one bit of `value` set (0 for 0)
            pub const fn lowest_one_bit(value: $prim) -> $prim {
                value & value.wrapping_neg()
            }

            /// Leading zero bits; the width for 0
            pub const fn number_of_leading_zeros(value: $prim) -> u32 {
                value.leading_zeros()
            }

            /// Trailing zero bits; the width for 0
            pub const fn number_of_trailing_zeros(value: $prim) -> u32 {
                value.trailing_zeros()
            }

            /// Reverse the bit order
            pub const fn reverse(value: $prim) -> $prim {
                value.reverse_bits()
            }

            /// Reverse the byte order
            pub const fn reverse_bytes(value: $prim) -> $prim {
                value.swap_bytes()
            }

            // =================================================================
            // Narrowing / widening views
            // =================================================================

            /// Low 8 bits
            pub const fn byte_value(self) -> i8 {
                self.0 as i8
            }

            /// Low 16 bits
            pub const fn short_value(self) -> i16 {
                self.0 as i16
            }

            /// Low 32 bits (or sign-extended)
            pub const fn int_value(self) -> i32 {
                self.0 as i32
            }

            /// Sign-extended to 64 bits
            pub const fn long_value(self) -> i64 {
                self.0 as i64
            }

            /// Nearest single-precision value
            pub fn float_value(self) -> f32 {
                self.0 as f32
            }

            /// Nearest double-precision value
            pub fn double_value(self) -> f64 {
                self.0 as f64
            }
        }

        impl Identity for $name {
            fn equals(&self, other: &Self) -> bool {
                self.0 == other.0
            }

            fn hash_code(&self) -> i32 {
                self.0.hash_code()
            }
        }

        impl Comparable for $name {
            fn compare_to(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::value_of(s)
            }
        }

        impl From<$prim> for $name {
            fn from(value: $prim) -> Self {
                $name(value)
            }
        }

        impl From<$name> for $prim {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

exact_integer!(
    /// Boxed 64-bit signed integer
    ///
    /// `hash_code` is the XOR of the high and low 32-bit halves.
    Long, i64, u64, 64
);

exact_integer!(
    /// Boxed 32-bit signed integer
    Int, i32, u32, 32
);

exact_integer!(
    /// Boxed 16-bit signed integer
    Short, i16, u16, 16
);

exact_integer!(
    /// Boxed 8-bit signed integer
    Byte, i8, u8, 8
);
