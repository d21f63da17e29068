//! Precision-tagged boxed numbers
//!
//! [`Float`] and [`Double`] wrap `f32`/`f64` and carry their precision as
//! part of their identity. [`Number`] is the tagged union over every boxed
//! numeric kind; values with different tags are never `equals`, even when
//! they denote the same real number.

use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::identity::{total_order_f64, Comparable, Identity};
use crate::integer::Long;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Shortest round-trip text in the host runtime's layout: plain with at
/// least one fractional digit for magnitudes in `[1e-3, 1e7)`, otherwise
/// `d.dddE±n`.
///
/// `sci` is the `{:e}` rendering of the absolute value.
pub(crate) fn shortest_text(sci: &str, negative: bool, magnitude: f64) -> String {
    let sign = if negative { "-" } else { "" };
    if magnitude == 0.0 {
        return format!("{}0.0", sign);
    }
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (1e-3..1e7).contains(&magnitude) {
        if exp >= 0 {
            let point = exp as usize + 1;
            if digits.len() > point {
                format!("{}{}.{}", sign, &digits[..point], &digits[point..])
            } else {
                format!("{}{}{}.0", sign, digits, "0".repeat(point - digits.len()))
            }
        } else {
            let zeros = "0".repeat((-exp - 1) as usize);
            format!("{}0.{}{}", sign, zeros, digits)
        }
    } else {
        let frac = if digits.len() > 1 { &digits[1..] } else { "0" };
        format!("{}{}.{}E{}", sign, &digits[..1], frac, exp)
    }
}

/// Parse straight to the target width so the value is rounded only once
fn parse_float_text<F: FromStr>(s: &str) -> Result<F> {
    let malformed = || Error::format(format!("For input string: \"{}\"", s));
    let trimmed = s.trim();
    let body = match trimmed.strip_suffix(['d', 'D', 'f', 'F']) {
        Some(rest) if rest.ends_with(|c: char| c.is_ascii_digit() || c == '.') => rest,
        _ => trimmed,
    };
    let text = match body {
        "NaN" => "NaN",
        "Infinity" | "+Infinity" => "inf",
        "-Infinity" => "-inf",
        _ if body.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => {
            return Err(malformed());
        }
        _ => body,
    };
    text.parse::<F>().map_err(|_| malformed())
}

macro_rules! boxed_float {
    ($(#[$meta:meta])* $name:ident, $prim:ty, $tag:expr, $bits:expr, $min_value:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $prim);

        impl $name {
            /// Largest finite value
            pub const MAX_VALUE: $name = $name(<$prim>::MAX);
            /// Smallest positive (subnormal) value
            pub const MIN_VALUE: $name = $name($min_value);
            /// Smallest positive normal value
            pub const MIN_NORMAL: $name = $name(<$prim>::MIN_POSITIVE);
            /// Not-a-number
            pub const NAN: $name = $name(<$prim>::NAN);
            /// Positive infinity
            pub const POSITIVE_INFINITY: $name = $name(<$prim>::INFINITY);
            /// Negative infinity
            pub const NEGATIVE_INFINITY: $name = $name(<$prim>::NEG_INFINITY);
            /// Largest unbiased exponent of a finite value
            pub const MAX_EXPONENT: i32 = <$prim>::MAX_EXP - 1;
            /// Smallest unbiased exponent of a normal value
            pub const MIN_EXPONENT: i32 = <$prim>::MIN_EXP - 1;
            /// Width in bits
            pub const SIZE: u32 = $bits;
            /// Width in bytes
            pub const BYTES: u32 = $bits / 8;

            /// Precision tag: `'f'` for single, `'d'` for double
            pub const fn type_tag(self) -> char {
                $tag
            }

            /// The primitive value
            pub const fn value(self) -> $prim {
                self.0
            }

            /// Parse text (surrounding whitespace, `NaN`, `Infinity` and a
            /// trailing `d`/`f` suffix are accepted)
            ///
            /// # Errors
            ///
            /// Returns `Error::Format` for anything else that is not a number.
            pub fn parse(s: &str) -> Result<$prim> {
                parse_float_text::<$prim>(s)
            }

            /// Parse text into a boxed value
            pub fn value_of(s: &str) -> Result<Self> {
                Self::parse(s).map($name)
            }

            /// Total-order comparison: `-0.0 < 0.0`, NaN above everything
            pub fn compare(a: $prim, b: $prim) -> Ordering {
                total_order_f64(a as f64, b as f64)
            }

            /// Sum of two primitives
            pub fn sum(a: $prim, b: $prim) -> $prim {
                a + b
            }

            /// Larger of two primitives (NaN if either is NaN)
            pub fn max(a: $prim, b: $prim) -> $prim {
                if a.is_nan() || b.is_nan() {
                    <$prim>::NAN
                } else if Self::compare(a, b) == Ordering::Less {
                    b
                } else {
                    a
                }
            }

            /// Smaller of two primitives (NaN if either is NaN)
            pub fn min(a: $prim, b: $prim) -> $prim {
                if a.is_nan() || b.is_nan() {
                    <$prim>::NAN
                } else if Self::compare(a, b) == Ordering::Greater {
                    b
                } else {
                    a
                }
            }

            /// True for NaN
            pub fn is_nan(self) -> bool {
                self.0.is_nan()
            }

            /// True for either infinity
            pub fn is_infinite(self) -> bool {
                self.0.is_infinite()
            }

            /// True unless NaN or infinite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Truncated and saturated; NaN becomes 0
            pub fn long_value(self) -> i64 {
                self.0 as i64
            }

            /// Truncated and saturated; NaN becomes 0
            pub fn int_value(self) -> i32 {
                self.0 as i32
            }

            /// Widened or narrowed to `f64`
            pub fn double_value(self) -> f64 {
                self.0 as f64
            }

            /// Widened or narrowed to `f32`
            pub fn float_value(self) -> f32 {
                self.0 as f32
            }
        }

        impl Identity for $name {
            fn equals(&self, other: &Self) -> bool {
                self.0.equals(&other.0)
            }

            fn hash_code(&self) -> i32 {
                self.0.hash_code()
            }
        }

        impl Comparable for $name {
            fn compare_to(&self, other: &Self) -> Ordering {
                Self::compare(self.0, other.0)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.equals(other)
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                state.write_i32(self.hash_code());
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let v = self.0;
                if v.is_nan() {
                    return f.write_str("NaN");
                }
                if v.is_infinite() {
                    return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
                }
                let sci = format!("{:e}", v.abs());
                f.write_str(&shortest_text(&sci, v.is_sign_negative(), v.abs() as f64))
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
    };
}

boxed_float!(
    /// Boxed single-precision float (`type_tag` is `'f'`)
    Float, f32, 'f', 32, 1.4e-45
);

boxed_float!(
    /// Boxed double-precision float (`type_tag` is `'d'`)
    Double, f64, 'd', 64, 4.9e-324
);

/// Tagged union over every boxed numeric kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    /// 64-bit integer
    Long(Long),
    /// Arbitrary-precision decimal
    Decimal(Decimal),
    /// Single-precision float
    Float(Float),
    /// Double-precision float
    Double(Double),
}

impl Number {
    /// Name of the variant's tag
    pub fn kind_name(&self) -> &'static str {
        match self {
            Number::Long(_) => "Long",
            Number::Decimal(_) => "Decimal",
            Number::Float(_) => "Float",
            Number::Double(_) => "Double",
        }
    }

    /// Integer part truncated to 64 bits
    pub fn long_value(&self) -> i64 {
        match self {
            Number::Long(v) => v.0,
            Number::Decimal(v) => v.long_value(),
            Number::Float(v) => v.long_value(),
            Number::Double(v) => v.long_value(),
        }
    }

    /// Integer part truncated to 32 bits
    pub fn int_value(&self) -> i32 {
        match self {
            Number::Long(v) => v.int_value(),
            Number::Decimal(v) => v.int_value(),
            Number::Float(v) => v.int_value(),
            Number::Double(v) => v.int_value(),
        }
    }

    /// Nearest `f64`
    pub fn double_value(&self) -> f64 {
        match self {
            Number::Long(v) => v.double_value(),
            Number::Decimal(v) => v.double_value(),
            Number::Float(v) => v.double_value(),
            Number::Double(v) => v.0,
        }
    }

    /// Nearest `f32`
    pub fn float_value(&self) -> f32 {
        match self {
            Number::Long(v) => v.float_value(),
            Number::Decimal(v) => v.float_value(),
            Number::Float(v) => v.0,
            Number::Double(v) => v.float_value(),
        }
    }

    /// Exact decimal value of this number
    ///
    /// # Errors
    ///
    /// Returns `Error::Format` for NaN and infinities.
    pub fn to_decimal(&self) -> Result<Decimal> {
        match self {
            Number::Long(v) => Ok(Decimal::value_of_long(v.0)),
            Number::Decimal(v) => Ok(v.clone()),
            Number::Float(v) => Decimal::parse(&v.to_string()),
            Number::Double(v) => Decimal::value_of_double(v.0),
        }
    }
}

impl Identity for Number {
    /// Same tag and equal payload
    fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Long(a), Number::Long(b)) => a.equals(b),
            (Number::Decimal(a), Number::Decimal(b)) => a.equals(b),
            (Number::Float(a), Number::Float(b)) => a.equals(b),
            (Number::Double(a), Number::Double(b)) => a.equals(b),
            _ => false,
        }
    }

    fn hash_code(&self) -> i32 {
        match self {
            Number::Long(v) => v.hash_code(),
            Number::Decimal(v) => v.hash_code(),
            Number::Float(v) => v.hash_code(),
            Number::Double(v) => v.hash_code(),
        }
    }
}

impl Comparable for Number {
    /// Same-tag values use their own order. Mixed tags compare as exact
    /// decimals when both are finite, otherwise by `f64` total order.
    fn compare_to(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Long(a), Number::Long(b)) => a.compare_to(b),
            (Number::Decimal(a), Number::Decimal(b)) => a.compare_to(b),
            (Number::Float(a), Number::Float(b)) => a.compare_to(b),
            (Number::Double(a), Number::Double(b)) => a.compare_to(b),
            _ => match (self.to_decimal(), other.to_decimal()) {
                (Ok(a), Ok(b)) => a.compare_to(&b),
                _ => total_order_f64(self.double_value(), other.double_value()),
            },
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Long(v) => v.fmt(f),
            Number::Decimal(v) => v.fmt(f),
            Number::Float(v) => v.fmt(f),
            Number::Double(v) => v.fmt(f),
        }
    }
}

impl From<Long> for Number {
    fn from(v: Long) -> Self {
        Number::Long(v)
    }
}

impl From<Decimal> for Number {
    fn from(v: Decimal) -> Self {
        Number::Decimal(v)
    }
}

impl From<Float> for Number {
    fn from(v: Float) -> Self {
        Number::Float(v)
    }
}

impl From<Double> for Number {
    fn from(v: Double) -> Self {
        Number::Double(v)
    }
}
