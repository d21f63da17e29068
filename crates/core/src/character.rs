//! Boxed UTF-16 code unit
//!
//! [`Character`] holds a single 16-bit code unit, so a supplementary
//! character needs two of them (a high surrogate followed by a low one).
//! The associated functions work on code points (`u32`) or on slices of
//! code units, which is how text is indexed throughout this crate.
//!
//! ## Radix digits
//!
//! [`Character::digit`] and [`Character::for_digit`] are the digit
//! conversions the integer radix parsers and printers are built on.

use crate::error::{Error, Result};
use crate::identity::{Comparable, Identity};
use crate::integer::{MAX_RADIX, MIN_RADIX};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Boxed UTF-16 code unit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Character(pub u16);

impl Character {
    /// Smallest code unit
    pub const MIN_VALUE: u16 = 0;
    /// Largest code unit
    pub const MAX_VALUE: u16 = 0xFFFF;
    /// First high (leading) surrogate
    pub const MIN_HIGH_SURROGATE: u16 = 0xD800;
    /// Last high (leading) surrogate
    pub const MAX_HIGH_SURROGATE: u16 = 0xDBFF;
    /// First low (trailing) surrogate
    pub const MIN_LOW_SURROGATE: u16 = 0xDC00;
    /// Last low (trailing) surrogate
    pub const MAX_LOW_SURROGATE: u16 = 0xDFFF;
    /// First surrogate of either kind
    pub const MIN_SURROGATE: u16 = Self::MIN_HIGH_SURROGATE;
    /// Last surrogate of either kind
    pub const MAX_SURROGATE: u16 = Self::MAX_LOW_SURROGATE;
    /// First code point outside the basic multilingual plane
    pub const MIN_SUPPLEMENTARY_CODE_POINT: u32 = 0x1_0000;
    /// Smallest code point
    pub const MIN_CODE_POINT: u32 = 0;
    /// Largest code point
    pub const MAX_CODE_POINT: u32 = 0x10_FFFF;
    /// Smallest radix accepted by `digit` and `for_digit`
    pub const MIN_RADIX: u32 = MIN_RADIX;
    /// Largest radix accepted by `digit` and `for_digit`
    pub const MAX_RADIX: u32 = MAX_RADIX;
    /// Width in bits
    pub const SIZE: u32 = 16;
    /// Width in bytes
    pub const BYTES: u32 = 2;

    /// Box a code unit
    pub const fn value_of(unit: u16) -> Self {
        Character(unit)
    }

    /// The code unit
    pub const fn char_value(self) -> u16 {
        self.0
    }

    /// The unit as a `char`; `None` for a lone surrogate
    pub fn to_char(self) -> Option<char> {
        char::from_u32(u32::from(self.0))
    }

    /// `a - b` as a signed difference
    pub fn compare(a: u16, b: u16) -> i32 {
        i32::from(a) - i32::from(b)
    }

    /// Hash of a code unit: its numeric value
    pub fn hash_code_of(unit: u16) -> i32 {
        i32::from(unit)
    }

    /// Text of a single code unit; a lone surrogate becomes U+FFFD
    pub fn to_string_of(unit: u16) -> String {
        String::from_utf16_lossy(&[unit])
    }

    // ------------------------------------------------------------------------
    // Radix digits
    // ------------------------------------------------------------------------

    /// Value of `code_point` as a digit in `radix`, or -1.
    ///
    /// ASCII digits and Latin letters in either case are recognised, as are
    /// their fullwidth forms (U+FF10..U+FF19, U+FF21..U+FF3A, U+FF41..U+FF5A).
    /// An out-of-range radix yields -1.
    pub fn digit(code_point: u32, radix: u32) -> i32 {
        if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
            return -1;
        }
        let ascii = match code_point {
            0xFF10..=0xFF19 => code_point - 0xFF10 + u32::from(b'0'),
            0xFF21..=0xFF3A => code_point - 0xFF21 + u32::from(b'A'),
            0xFF41..=0xFF5A => code_point - 0xFF41 + u32::from(b'a'),
            _ => code_point,
        };
        char::from_u32(ascii)
            .filter(char::is_ascii)
            .and_then(|c| c.to_digit(radix))
            .map_or(-1, |d| d as i32)
    }

    /// Lower-case character for `digit` in `radix`; `None` when either is
    /// out of range
    pub fn for_digit(digit: u32, radix: u32) -> Option<char> {
        if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
            return None;
        }
        char::from_digit(digit, radix)
    }

    // ------------------------------------------------------------------------
    // Code points and surrogates
    // ------------------------------------------------------------------------

    /// True for `0..=0x10FFFF`
    pub fn is_valid_code_point(code_point: u32) -> bool {
        code_point <= Self::MAX_CODE_POINT
    }

    /// True when the code point fits in one code unit
    pub fn is_bmp_code_point(code_point: u32) -> bool {
        code_point < Self::MIN_SUPPLEMENTARY_CODE_POINT
    }

    /// True when the code point needs a surrogate pair
    pub fn is_supplementary_code_point(code_point: u32) -> bool {
        (Self::MIN_SUPPLEMENTARY_CODE_POINT..=Self::MAX_CODE_POINT).contains(&code_point)
    }

    /// True for U+D800..U+DBFF
    pub fn is_high_surrogate(unit: u16) -> bool {
        (Self::MIN_HIGH_SURROGATE..=Self::MAX_HIGH_SURROGATE).contains(&unit)
    }

    /// True for U+DC00..U+DFFF
    pub fn is_low_surrogate(unit: u16) -> bool {
        (Self::MIN_LOW_SURROGATE..=Self::MAX_LOW_SURROGATE).contains(&unit)
    }

    /// True for any surrogate
    pub fn is_surrogate(unit: u16) -> bool {
        (Self::MIN_SURROGATE..=Self::MAX_SURROGATE).contains(&unit)
    }

    /// True when `high` then `low` form a valid pair
    pub fn is_surrogate_pair(high: u16, low: u16) -> bool {
        Self::is_high_surrogate(high) && Self::is_low_surrogate(low)
    }

    /// Code units needed for `code_point`: 2 for supplementary, else 1
    pub fn char_count(code_point: u32) -> usize {
        if code_point >= Self::MIN_SUPPLEMENTARY_CODE_POINT {
            2
        } else {
            1
        }
    }

    /// Code point of a surrogate pair; the pair is not validated
    pub fn to_code_point(high: u16, low: u16) -> u32 {
        ((u32::from(high) - u32::from(Self::MIN_HIGH_SURROGATE)) << 10)
            + (u32::from(low) - u32::from(Self::MIN_LOW_SURROGATE))
            + Self::MIN_SUPPLEMENTARY_CODE_POINT
    }

    /// UTF-16 encoding of `code_point`
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalArgument` for a value above U+10FFFF.
    pub fn to_chars(code_point: u32) -> Result<Vec<u16>> {
        if Self::is_bmp_code_point(code_point) {
            return Ok(vec![code_point as u16]);
        }
        if !Self::is_valid_code_point(code_point) {
            return Err(Error::illegal_argument(format!(
                "Not a valid Unicode code point: 0x{:X}",
                code_point
            )));
        }
        let offset = code_point - Self::MIN_SUPPLEMENTARY_CODE_POINT;
        Ok(vec![
            Self::MIN_HIGH_SURROGATE + (offset >> 10) as u16,
            Self::MIN_LOW_SURROGATE + (offset & 0x3FF) as u16,
        ])
    }

    /// Code point starting at `index`; an unpaired surrogate is returned as is
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` when `index >= units.len()`.
    pub fn code_point_at(units: &[u16], index: usize) -> Result<u32> {
        let high = *units
            .get(index)
            .ok_or_else(|| Error::index_out_of_range(index, units.len()))?;
        match units.get(index + 1) {
            Some(&low) if Self::is_surrogate_pair(high, low) => Ok(Self::to_code_point(high, low)),
            _ => Ok(u32::from(high)),
        }
    }

    /// Code point ending just before `index`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` when `index` is 0 or past the end.
    pub fn code_point_before(units: &[u16], index: usize) -> Result<u32> {
        if index == 0 || index > units.len() {
            return Err(Error::index_out_of_range(index, units.len()));
        }
        let low = units[index - 1];
        if index >= 2 {
            let high = units[index - 2];
            if Self::is_surrogate_pair(high, low) {
                return Ok(Self::to_code_point(high, low));
            }
        }
        Ok(u32::from(low))
    }

    /// Code points in `units[begin..end]`; an unpaired surrogate counts as one
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` when the range is not within `units`.
    pub fn code_point_count(units: &[u16], begin: usize, end: usize) -> Result<usize> {
        if begin > end {
            return Err(Error::index_out_of_range(begin, end));
        }
        let window = units
            .get(begin..end)
            .ok_or_else(|| Error::index_out_of_range(end, units.len()))?;
        let pairs = window
            .windows(2)
            .filter(|w| Self::is_surrogate_pair(w[0], w[1]))
            .count();
        Ok(window.len() - pairs)
    }

    /// Index `offset` code points away from `index` (negative moves back)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` when the walk leaves `units`.
    pub fn offset_by_code_points(units: &[u16], index: usize, offset: i64) -> Result<usize> {
        let size = units.len();
        if index > size {
            return Err(Error::index_out_of_range(index, size));
        }
        let mut at = index;
        if offset >= 0 {
            for _ in 0..offset {
                if at >= size {
                    return Err(Error::index_out_of_range(at, size));
                }
                let pair = at + 1 < size && Self::is_surrogate_pair(units[at], units[at + 1]);
                at += if pair { 2 } else { 1 };
            }
        } else {
            for _ in 0..offset.unsigned_abs() {
                if at == 0 {
                    return Err(Error::index_out_of_range(-1i64, size));
                }
                let pair = at >= 2 && Self::is_surrogate_pair(units[at - 2], units[at - 1]);
                at -= if pair { 2 } else { 1 };
            }
        }
        Ok(at)
    }

    // ------------------------------------------------------------------------
    // Classification and case
    // ------------------------------------------------------------------------

    fn scalar(code_point: u32) -> Option<char> {
        char::from_u32(code_point)
    }

    /// Decimal digit as recognised by [`Character::digit`]
    pub fn is_digit(code_point: u32) -> bool {
        Self::digit(code_point, 10) >= 0
    }

    /// Alphabetic code point
    pub fn is_letter(code_point: u32) -> bool {
        Self::scalar(code_point).map_or(false, char::is_alphabetic)
    }

    /// Letter or decimal digit
    pub fn is_letter_or_digit(code_point: u32) -> bool {
        Self::is_letter(code_point) || Self::is_digit(code_point)
    }

    /// Lower-case code point
    pub fn is_lower_case(code_point: u32) -> bool {
        Self::scalar(code_point).map_or(false, char::is_lowercase)
    }

    /// Upper-case code point
    pub fn is_upper_case(code_point: u32) -> bool {
        Self::scalar(code_point).map_or(false, char::is_uppercase)
    }

    /// Unicode space separators other than the no-break spaces, plus the
    /// ASCII controls HT, LF, VT, FF, CR and FS..US
    pub fn is_whitespace(code_point: u32) -> bool {
        match code_point {
            0x09..=0x0D | 0x1C..=0x1F => true,
            0x00A0 | 0x2007 | 0x202F => false,
            _ => Self::scalar(code_point).map_or(false, char::is_whitespace) && code_point != 0x85,
        }
    }

    /// Legacy ASCII space test: space, HT, LF, FF and CR
    pub fn is_space(unit: u16) -> bool {
        matches!(unit, 0x20 | 0x09 | 0x0A | 0x0C | 0x0D)
    }

    /// Single-code-point lower-case mapping; unchanged when the mapping
    /// would expand
    pub fn to_lower_case(code_point: u32) -> u32 {
        Self::single_mapping(code_point, |c| c.to_lowercase().collect())
    }

    /// Single-code-point upper-case mapping; unchanged when the mapping
    /// would expand
    pub fn to_upper_case(code_point: u32) -> u32 {
        Self::single_mapping(code_point, |c| c.to_uppercase().collect())
    }

    fn single_mapping(code_point: u32, map: impl Fn(char) -> Vec<char>) -> u32 {
        match Self::scalar(code_point).map(map).as_deref() {
            Some([one]) => u32::from(*one),
            _ => code_point,
        }
    }
}

impl Identity for Character {
    fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn hash_code(&self) -> i32 {
        Character::hash_code_of(self.0)
    }
}

impl Comparable for Character {
    fn compare_to(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Character::to_string_of(self.0))
    }
}

impl From<u16> for Character {
    fn from(unit: u16) -> Self {
        Character(unit)
    }
}

impl From<Character> for u16 {
    fn from(value: Character) -> Self {
        value.0
    }
}

impl TryFrom<char> for Character {
    type Error = Error;

    /// Fails for characters outside the basic multilingual plane
    fn try_from(c: char) -> Result<Self> {
        u16::try_from(u32::from(c)).map(Character).map_err(|_| {
            Error::illegal_argument(format!("U+{:X} needs a surrogate pair", u32::from(c)))
        })
    }
}
