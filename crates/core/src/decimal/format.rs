//! Decimal text forms
//!
//! Three renderings share one layout routine:
//!
//! - `to_string`: plain when `scale >= 0` and the adjusted exponent is at
//!   least -6, otherwise scientific with an explicit `E+`/`E-` exponent
//! - `to_engineering_string`: like `to_string` but the exponent is a
//!   multiple of three
//! - `to_plain_string`: never an exponent
//!
//! The adjusted exponent is `-scale + (digits(unscaled) - 1)`.

use super::Decimal;
use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;
use std::str::FromStr;

impl Decimal {
    /// Render with an engineering exponent (a multiple of three) when an
    /// exponent is needed.
    pub fn to_engineering_string(&self) -> String {
        layout(self, false)
    }

    /// Render without an exponent.
    pub fn to_plain_string(&self) -> String {
        let coeff = self.unscaled.abs().to_string();
        let sign = if self.unscaled.is_negative() { "-" } else { "" };

        if self.scale == 0 {
            return format!("{}{}", sign, coeff);
        }
        if self.scale < 0 {
            if self.unscaled.is_zero() {
                return "0".to_string();
            }
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            return format!("{}{}{}", sign, coeff, zeros);
        }
        format!("{}{}", sign, insert_point(&coeff, self.scale as usize))
    }

    /// Parse decimal text: optional sign, digits with an optional `.`, and an
    /// optional `e`/`E` exponent with its own sign.
    ///
    /// # Errors
    ///
    /// Returns `Error::Format` if the text is malformed or the resulting
    /// scale does not fit a 32-bit signed integer.
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || Error::format(format!("Invalid decimal text: \"{}\"", s));

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            Some(_) => (false, s),
            None => return Err(malformed()),
        };

        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        let all_digits = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(malformed());
        }

        let exp: i64 = match exponent {
            None => 0,
            Some(text) => {
                let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
                if digits.is_empty() || !all_digits(digits) {
                    return Err(malformed());
                }
                text.parse::<i64>()
                    .map_err(|_| Error::format(format!("Exponent overflow in \"{}\"", s)))?
            }
        };

        let scale = (frac_part.len() as i64)
            .checked_sub(exp)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| Error::format(format!("Scale out of range in \"{}\"", s)))?;

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let magnitude = BigInt::from_str(&digits).map_err(|_| malformed())?;
        let unscaled = if negative { -magnitude } else { magnitude };

        Ok(Decimal::from_parts(unscaled, scale))
    }
}

/// `coeff` with a decimal point `scale` digits from the right, padding with
/// leading zeros as needed.
fn insert_point(coeff: &str, scale: usize) -> String {
    if coeff.len() > scale {
        let point = coeff.len() - scale;
        format!("{}.{}", &coeff[..point], &coeff[point..])
    } else {
        format!("0.{}{}", "0".repeat(scale - coeff.len()), coeff)
    }
}

fn push_exponent(buf: &mut String, adjusted: i64) {
    if adjusted != 0 {
        buf.push('E');
        if adjusted > 0 {
            buf.push('+');
        }
        buf.push_str(&adjusted.to_string());
    }
}

fn layout(value: &Decimal, scientific: bool) -> String {
    let coeff = value.unscaled.abs().to_string();
    let mut buf = String::new();
    if value.unscaled.is_negative() {
        buf.push('-');
    }

    if value.scale == 0 {
        buf.push_str(&coeff);
        return buf;
    }

    let mut adjusted = -(value.scale as i64) + (coeff.len() as i64 - 1);
    if value.scale > 0 && adjusted >= -6 {
        buf.push_str(&insert_point(&coeff, value.scale as usize));
        return buf;
    }

    if scientific {
        buf.push_str(&coeff[..1]);
        if coeff.len() > 1 {
            buf.push('.');
            buf.push_str(&coeff[1..]);
        }
        push_exponent(&mut buf, adjusted);
        return buf;
    }

    let mut sig = adjusted.rem_euclid(3);
    adjusted -= sig;
    sig += 1;
    let sig = sig as usize;
    if value.unscaled.is_zero() {
        match sig {
            1 => buf.push('0'),
            2 => {
                buf.push_str("0.00");
                adjusted += 3;
            }
            _ => {
                buf.push_str("0.0");
                adjusted += 3;
            }
        }
    } else if sig >= coeff.len() {
        buf.push_str(&coeff);
        buf.push_str(&"0".repeat(sig - coeff.len()));
    } else {
        buf.push_str(&coeff[..sig]);
        buf.push('.');
        buf.push_str(&coeff[sig..]);
    }
    push_exponent(&mut buf, adjusted);
    buf
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&layout(self, true))
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Decimal::parse(s)
    }
}
