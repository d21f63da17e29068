//! Rounding policies for inexact decimal results

use crate::error::{Error, Result};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Policy selecting which of two adjacent representable values an inexact
/// result is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Towards zero (truncation)
    Down,
    /// Towards positive infinity
    Ceiling,
    /// Towards negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties towards zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    HalfEven,
    /// Assert that no rounding is needed
    Unnecessary,
}

impl RoundingMode {
    /// Map a legacy integer rounding code (`ROUND_UP = 0` .. `ROUND_UNNECESSARY = 7`)
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalArgument` for codes outside 0..=7.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(RoundingMode::Up),
            1 => Ok(RoundingMode::Down),
            2 => Ok(RoundingMode::Ceiling),
            3 => Ok(RoundingMode::Floor),
            4 => Ok(RoundingMode::HalfUp),
            5 => Ok(RoundingMode::HalfDown),
            6 => Ok(RoundingMode::HalfEven),
            7 => Ok(RoundingMode::Unnecessary),
            _ => Err(Error::illegal_argument(format!(
                "rounding code {} not in [0,7]",
                code
            ))),
        }
    }

    /// Legacy integer code of this mode
    pub fn code(self) -> i32 {
        match self {
            RoundingMode::Up => 0,
            RoundingMode::Down => 1,
            RoundingMode::Ceiling => 2,
            RoundingMode::Floor => 3,
            RoundingMode::HalfUp => 4,
            RoundingMode::HalfDown => 5,
            RoundingMode::HalfEven => 6,
            RoundingMode::Unnecessary => 7,
        }
    }

    /// All modes in code order
    pub fn values() -> [RoundingMode; 8] {
        [
            RoundingMode::Up,
            RoundingMode::Down,
            RoundingMode::Ceiling,
            RoundingMode::Floor,
            RoundingMode::HalfUp,
            RoundingMode::HalfDown,
            RoundingMode::HalfEven,
            RoundingMode::Unnecessary,
        ]
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Unnecessary => "UNNECESSARY",
        };
        f.write_str(name)
    }
}

/// Integer division `n / d` rounded per `mode`. `d` must be non-zero.
pub(crate) fn round_div(n: &BigInt, d: &BigInt, mode: RoundingMode) -> Result<BigInt> {
    let (q, r) = n.div_rem(d);
    if r.is_zero() {
        return Ok(q);
    }

    let positive = (n.sign() == Sign::Minus) == (d.sign() == Sign::Minus);
    let half = (r.magnitude() * 2u32).cmp(d.magnitude());
    let away = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => positive,
        RoundingMode::Floor => !positive,
        RoundingMode::HalfUp => half != Ordering::Less,
        RoundingMode::HalfDown => half == Ordering::Greater,
        RoundingMode::HalfEven => {
            half == Ordering::Greater || (half == Ordering::Equal && q.is_odd())
        }
        RoundingMode::Unnecessary => return Err(Error::arithmetic("Rounding necessary")),
    };

    Ok(match (away, positive) {
        (false, _) => q,
        (true, true) => q + 1,
        (true, false) => q - 1,
    })
}
