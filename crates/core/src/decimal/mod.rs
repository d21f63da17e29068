//! Arbitrary-precision scaled decimal
//!
//! A [`Decimal`] is an unscaled arbitrary-precision integer plus a 32-bit
//! scale: the value is `unscaled × 10^-scale`. The scale is part of the
//! value's identity, so `1.0` and `1.00` are not `equals` even though they
//! compare as equal.
//!
//! ## Division
//!
//! - [`Decimal::divide`] is exact: it fails with `Error::Arithmetic` when the
//!   quotient has no terminating decimal expansion
//! - [`Decimal::divide_with_rounding`] and
//!   [`Decimal::divide_with_scale_and_rounding`] always succeed unless the
//!   divisor is zero or the mode is `Unnecessary` and rounding is required

mod format;
mod rounding;

pub use rounding::RoundingMode;

use crate::boxed::shortest_text;
use crate::error::{Error, Result};
use crate::identity::{Comparable, Identity};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use rounding::round_div;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;

/// `0` at scale 0
pub static ZERO: Lazy<Decimal> = Lazy::new(|| Decimal::value_of_long(0));
/// `1` at scale 0
pub static ONE: Lazy<Decimal> = Lazy::new(|| Decimal::value_of_long(1));
/// `10` at scale 0
pub static TEN: Lazy<Decimal> = Lazy::new(|| Decimal::value_of_long(10));

/// Largest exponent accepted by [`Decimal::pow`]
pub const MAX_POW_EXPONENT: i32 = 999_999_999;

pub(crate) fn pow10(n: u32) -> BigInt {
    BigInt::from(10u32).pow(n)
}

/// `10^shift` for a scale difference that must fit in `u32`
fn pow10_checked(shift: u64) -> Result<BigInt> {
    u32::try_from(shift)
        .map(pow10)
        .map_err(|_| Error::arithmetic("Overflow"))
}

fn clamp_scale(scale: i64) -> i32 {
    scale.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn checked_scale(scale: i64) -> Result<i32> {
    i32::try_from(scale).map_err(|_| {
        if scale > 0 {
            Error::arithmetic("Underflow")
        } else {
            Error::arithmetic("Overflow")
        }
    })
}

/// Immutable arbitrary-precision signed decimal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: i32,
}

impl Decimal {
    /// Legacy code for [`RoundingMode::Up`]
    pub const ROUND_UP: i32 = 0;
    /// Legacy code for [`RoundingMode::Down`]
    pub const ROUND_DOWN: i32 = 1;
    /// Legacy code for [`RoundingMode::Ceiling`]
    pub const ROUND_CEILING: i32 = 2;
    /// Legacy code for [`RoundingMode::Floor`]
    pub const ROUND_FLOOR: i32 = 3;
    /// Legacy code for [`RoundingMode::HalfUp`]
    pub const ROUND_HALF_UP: i32 = 4;
    /// Legacy code for [`RoundingMode::HalfDown`]
    pub const ROUND_HALF_DOWN: i32 = 5;
    /// Legacy code for [`RoundingMode::HalfEven`]
    pub const ROUND_HALF_EVEN: i32 = 6;
    /// Legacy code for [`RoundingMode::Unnecessary`]
    pub const ROUND_UNNECESSARY: i32 = 7;

    // ========================================================================
    // Construction
    // ========================================================================

    /// Build from an unscaled integer and a scale
    pub fn from_parts(unscaled: BigInt, scale: i32) -> Self {
        Decimal { unscaled, scale }
    }

    /// Integer value at scale 0
    pub fn value_of_long(value: i64) -> Self {
        Decimal::from_parts(BigInt::from(value), 0)
    }

    /// `unscaled × 10^-scale`
    pub fn value_of_long_with_scale(unscaled: i64, scale: i32) -> Self {
        Decimal::from_parts(BigInt::from(unscaled), scale)
    }

    /// Decimal from the shortest text that round-trips `value`.
    ///
    /// The result always carries at least one fractional digit in the
    /// plain range, so `value_of_double(2.0)` is `2.0` (scale 1).
    ///
    /// # Errors
    ///
    /// Returns `Error::Format` for NaN and infinities.
    pub fn value_of_double(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::format(format!("Infinite or NaN: {}", value)));
        }
        let text = shortest_text(&format!("{:e}", value.abs()), value < 0.0, value.abs());
        Decimal::parse(&text)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Power-of-ten exponent of the fractional part
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// The unscaled integer
    pub fn unscaled_value(&self) -> &BigInt {
        &self.unscaled
    }

    /// -1, 0 or 1
    pub fn signum(&self) -> i32 {
        match self.unscaled.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    /// Number of decimal digits in the unscaled value (1 for zero)
    pub fn precision(&self) -> u32 {
        if self.unscaled.is_zero() {
            return 1;
        }
        self.unscaled.magnitude().to_string().len() as u32
    }

    /// One unit in the last place: `1 × 10^-scale`
    pub fn ulp(&self) -> Self {
        Decimal::from_parts(BigInt::one(), self.scale)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    fn aligned(&self, other: &Self) -> (BigInt, BigInt, i32) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.unscaled.clone(), other.unscaled.clone(), self.scale),
            Ordering::Less => {
                let shift = other.scale.abs_diff(self.scale);
                (&self.unscaled * pow10(shift), other.unscaled.clone(), other.scale)
            }
            Ordering::Greater => {
                let shift = self.scale.abs_diff(other.scale);
                (self.unscaled.clone(), &other.unscaled * pow10(shift), self.scale)
            }
        }
    }

    /// Sum at `max(self.scale, other.scale)`
    pub fn add(&self, other: &Self) -> Self {
        let (a, b, scale) = self.aligned(other);
        Decimal::from_parts(a + b, scale)
    }

    /// Difference at `max(self.scale, other.scale)`
    pub fn subtract(&self, other: &Self) -> Self {
        let (a, b, scale) = self.aligned(other);
        Decimal::from_parts(a - b, scale)
    }

    /// Product at `self.scale + other.scale`
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` if the resulting scale overflows.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        let scale = checked_scale(self.scale as i64 + other.scale as i64)?;
        Ok(Decimal::from_parts(&self.unscaled * &other.unscaled, scale))
    }

    /// Value with the sign flipped, same scale
    pub fn negate(&self) -> Self {
        Decimal::from_parts(-&self.unscaled, self.scale)
    }

    /// Absolute value, same scale
    pub fn abs(&self) -> Self {
        Decimal::from_parts(self.unscaled.abs(), self.scale)
    }

    /// Identity operation
    pub fn plus(&self) -> Self {
        self.clone()
    }

    /// Larger of the two; `self` on ties
    pub fn max(&self, other: &Self) -> Self {
        if self.compare_to(other) != Ordering::Less {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Smaller of the two; `self` on ties
    pub fn min(&self, other: &Self) -> Self {
        if self.compare_to(other) != Ordering::Greater {
            self.clone()
        } else {
            other.clone()
        }
    }

    fn check_divisor(&self, divisor: &Self) -> Result<()> {
        if divisor.unscaled.is_zero() {
            if self.unscaled.is_zero() {
                return Err(Error::arithmetic("Division undefined"));
            }
            return Err(Error::arithmetic("Division by zero"));
        }
        Ok(())
    }

    /// Exact quotient.
    ///
    /// The result has the preferred scale `self.scale - divisor.scale` when
    /// that represents the quotient exactly, otherwise the smallest larger
    /// scale that does.
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` on a zero divisor, or when the quotient
    /// has a non-terminating decimal expansion.
    pub fn divide(&self, divisor: &Self) -> Result<Self> {
        self.check_divisor(divisor)?;
        let preferred = self.scale as i64 - divisor.scale as i64;

        if self.unscaled.is_zero() {
            return Ok(Decimal::from_parts(BigInt::zero(), clamp_scale(preferred)));
        }

        let g = self.unscaled.gcd(&divisor.unscaled);
        let mut numerator = &self.unscaled / &g;
        let mut denominator = &divisor.unscaled / &g;
        if denominator.is_negative() {
            numerator = -numerator;
            denominator = -denominator;
        }

        // terminating iff the reduced denominator is 2^a * 5^b
        let mut rest = denominator.clone();
        let (mut twos, mut fives) = (0u32, 0u32);
        let two = BigInt::from(2u32);
        let five = BigInt::from(5u32);
        while rest.is_even() {
            rest /= &two;
            twos += 1;
        }
        while (&rest % &five).is_zero() {
            rest /= &five;
            fives += 1;
        }
        if !rest.is_one() {
            return Err(Error::arithmetic(
                "Non-terminating decimal expansion; no exact representable decimal result.",
            ));
        }

        let k = twos.max(fives);
        let unscaled = numerator * (pow10(k) / denominator);
        let exact = Decimal::from_parts(unscaled, checked_scale(preferred + k as i64)?);
        Ok(exact.strip_zeros_to(preferred))
    }

    /// Quotient at the dividend's scale
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` on a zero divisor, or for
    /// `RoundingMode::Unnecessary` when the quotient is inexact.
    pub fn divide_with_rounding(&self, divisor: &Self, mode: RoundingMode) -> Result<Self> {
        self.divide_with_scale_and_rounding(divisor, self.scale, mode)
    }

    /// Quotient at an explicit scale
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` on a zero divisor, or for
    /// `RoundingMode::Unnecessary` when the quotient is inexact.
    pub fn divide_with_scale_and_rounding(
        &self,
        divisor: &Self,
        scale: i32,
        mode: RoundingMode,
    ) -> Result<Self> {
        self.check_divisor(divisor)?;
        // unscaled result = u1 * 10^(scale - s1 + s2) / u2
        let shift = scale as i64 - self.scale as i64 + divisor.scale as i64;
        let (numerator, denominator) = if shift >= 0 {
            (&self.unscaled * pow10_checked(shift.unsigned_abs())?, divisor.unscaled.clone())
        } else {
            (
                self.unscaled.clone(),
                &divisor.unscaled * pow10_checked(shift.unsigned_abs())?,
            )
        };
        let unscaled = round_div(&numerator, &denominator, mode)?;
        Ok(Decimal::from_parts(unscaled, scale))
    }

    /// Integer part of the quotient, at preferred scale `self.scale - divisor.scale`
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` on a zero divisor.
    pub fn divide_to_integral_value(&self, divisor: &Self) -> Result<Self> {
        self.check_divisor(divisor)?;
        let preferred = self.scale as i64 - divisor.scale as i64;
        let quotient = self.divide_with_scale_and_rounding(divisor, 0, RoundingMode::Down)?;

        if preferred > 0 {
            let scale = checked_scale(preferred)?;
            let unscaled = quotient.unscaled * pow10(scale.unsigned_abs());
            return Ok(Decimal::from_parts(unscaled, scale));
        }
        if quotient.unscaled.is_zero() {
            return Ok(Decimal::from_parts(BigInt::zero(), clamp_scale(preferred)));
        }
        Ok(quotient.strip_zeros_to(preferred))
    }

    /// `self - self.divide_to_integral_value(divisor) * divisor`
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` on a zero divisor.
    pub fn remainder(&self, divisor: &Self) -> Result<Self> {
        Ok(self.divide_and_remainder(divisor)?.1)
    }

    /// `(divide_to_integral_value, remainder)` computed together
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` on a zero divisor.
    pub fn divide_and_remainder(&self, divisor: &Self) -> Result<(Self, Self)> {
        let quotient = self.divide_to_integral_value(divisor)?;
        let remainder = self.subtract(&quotient.multiply(divisor)?);
        Ok((quotient, remainder))
    }

    /// `self^n` at scale `self.scale * n`
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` if `n` is outside `[0, 999999999]` or the
    /// scale overflows.
    pub fn pow(&self, n: i32) -> Result<Self> {
        if !(0..=MAX_POW_EXPONENT).contains(&n) {
            return Err(Error::arithmetic("Invalid operation"));
        }
        let scale = checked_scale(self.scale as i64 * n as i64)?;
        Ok(Decimal::from_parts(self.unscaled.pow(n as u32), scale))
    }

    // ========================================================================
    // Scale transforms
    // ========================================================================

    /// Remove trailing zeros from the unscaled value, never going below
    /// `floor` as the scale.
    fn strip_zeros_to(mut self, floor: i64) -> Self {
        let ten = BigInt::from(10u32);
        while (self.scale as i64) > floor && self.scale > i32::MIN && !self.unscaled.is_zero() {
            let (q, r) = self.unscaled.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            self.unscaled = q;
            self.scale -= 1;
        }
        self
    }

    /// Numerically equal value with all trailing zeros removed; zero becomes `0`
    pub fn strip_trailing_zeros(&self) -> Self {
        if self.unscaled.is_zero() {
            return ZERO.clone();
        }
        self.clone().strip_zeros_to(i64::MIN)
    }

    /// Same value at `new_scale`
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` ("Rounding necessary") if reducing the
    /// scale would discard non-zero digits.
    pub fn set_scale(&self, new_scale: i32) -> Result<Self> {
        self.set_scale_with_rounding(new_scale, RoundingMode::Unnecessary)
    }

    /// Value at `new_scale`, rounding discarded digits per `mode`
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` only for `RoundingMode::Unnecessary` when
    /// digits would be lost.
    pub fn set_scale_with_rounding(&self, new_scale: i32, mode: RoundingMode) -> Result<Self> {
        match new_scale.cmp(&self.scale) {
            Ordering::Equal => Ok(self.clone()),
            Ordering::Greater => {
                let shift = new_scale.abs_diff(self.scale);
                Ok(Decimal::from_parts(&self.unscaled * pow10(shift), new_scale))
            }
            Ordering::Less => {
                let shift = self.scale.abs_diff(new_scale);
                let unscaled = round_div(&self.unscaled, &pow10(shift), mode)?;
                Ok(Decimal::from_parts(unscaled, new_scale))
            }
        }
    }

    /// Move the decimal point `n` places left; the result scale is at least 0
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` if the scale overflows.
    pub fn move_point_left(&self, n: i32) -> Result<Self> {
        self.with_clamped_scale(self.scale as i64 + n as i64)
    }

    /// Move the decimal point `n` places right; the result scale is at least 0
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` if the scale overflows.
    pub fn move_point_right(&self, n: i32) -> Result<Self> {
        self.with_clamped_scale(self.scale as i64 - n as i64)
    }

    fn with_clamped_scale(&self, scale: i64) -> Result<Self> {
        let moved = Decimal::from_parts(self.unscaled.clone(), checked_scale(scale)?);
        if moved.scale < 0 {
            moved.set_scale(0)
        } else {
            Ok(moved)
        }
    }

    /// `self × 10^n`, expressed purely as a scale change
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` if the scale overflows.
    pub fn scale_by_power_of_ten(&self, n: i32) -> Result<Self> {
        let scale = checked_scale(self.scale as i64 - n as i64)?;
        Ok(Decimal::from_parts(self.unscaled.clone(), scale))
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Integer part, truncated towards zero
    pub fn to_big_integer(&self) -> BigInt {
        if self.scale <= 0 {
            &self.unscaled * pow10(self.scale.unsigned_abs())
        } else {
            &self.unscaled / pow10(self.scale.unsigned_abs())
        }
    }

    fn integral_exact(&self) -> Result<BigInt> {
        if self.scale > 0 {
            let (q, r) = self.unscaled.div_rem(&pow10(self.scale.unsigned_abs()));
            if !r.is_zero() {
                return Err(Error::arithmetic("Rounding necessary"));
            }
            return Ok(q);
        }
        // 10^19 already exceeds every exact target width
        if self.scale < -19 && !self.unscaled.is_zero() {
            return Err(Error::arithmetic("Overflow"));
        }
        Ok(self.to_big_integer())
    }

    /// Integer part truncated, then the low 64 bits (wrapping)
    pub fn long_value(&self) -> i64 {
        // 10^64 is a multiple of 2^64, so the low 64 bits vanish
        if self.scale < -63 {
            return 0;
        }
        let integral = self.to_big_integer();
        let low = integral.magnitude().iter_u64_digits().next().unwrap_or(0);
        if integral.is_negative() {
            low.wrapping_neg() as i64
        } else {
            low as i64
        }
    }

    /// Integer part truncated, then the low 32 bits (wrapping)
    pub fn int_value(&self) -> i32 {
        self.long_value() as i32
    }

    /// Nearest `f64`
    pub fn double_value(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Nearest `f32`
    pub fn float_value(&self) -> f32 {
        self.to_string().parse().unwrap_or(f32::NAN)
    }

    /// Exact `i64` conversion
    ///
    /// # Errors
    ///
    /// Returns `Error::Arithmetic` ("Rounding necessary") for a non-zero
    /// fraction, or ("Overflow") when out of range.
    pub fn long_value_exact(&self) -> Result<i64> {
        self.integral_exact()?
            .to_i64()
            .ok_or_else(|| Error::arithmetic("Overflow"))
    }

    /// Exact `i32` conversion
    ///
    /// # Errors
    ///
    /// As [`Decimal::long_value_exact`].
    pub fn int_value_exact(&self) -> Result<i32> {
        self.integral_exact()?
            .to_i32()
            .ok_or_else(|| Error::arithmetic("Overflow"))
    }

    /// Exact `i16` conversion
    ///
    /// # Errors
    ///
    /// As [`Decimal::long_value_exact`].
    pub fn short_value_exact(&self) -> Result<i16> {
        self.integral_exact()?
            .to_i16()
            .ok_or_else(|| Error::arithmetic("Overflow"))
    }

    /// Exact `i8` conversion
    ///
    /// # Errors
    ///
    /// As [`Decimal::long_value_exact`].
    pub fn byte_value_exact(&self) -> Result<i8> {
        self.integral_exact()?
            .to_i8()
            .ok_or_else(|| Error::arithmetic("Overflow"))
    }
}

/// 31-polynomial over the 32-bit magnitude words (most significant first),
/// times the sign.
fn big_integer_hash(value: &BigInt) -> i32 {
    let h = value
        .magnitude()
        .to_u32_digits()
        .iter()
        .rev()
        .fold(0i32, |h, word| h.wrapping_mul(31).wrapping_add(*word as i32));
    h.wrapping_mul(value.signum().to_i32().unwrap_or(0))
}

impl Identity for Decimal {
    /// Value and scale must both match
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        big_integer_hash(&self.unscaled)
            .wrapping_mul(31)
            .wrapping_add(self.scale)
    }
}

impl Comparable for Decimal {
    /// Numeric comparison; scale is ignored
    fn compare_to(&self, other: &Self) -> Ordering {
        let (a, b) = (self.signum(), other.signum());
        if a != b {
            return a.cmp(&b);
        }
        if a == 0 {
            return Ordering::Equal;
        }
        let (x, y, _) = self.aligned(other);
        x.cmp(&y)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::from_parts(-self.unscaled, self.scale)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::value_of_long(value)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::from_parts(value, 0)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Decimal::parse(&text).map_err(serde::de::Error::custom)
    }
}
