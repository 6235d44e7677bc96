//! Fixed-point monetary arithmetic
//!
//! Expense amounts are stored as integer cents (scale 100) so that summing
//! millions of records never accumulates floating-point drift. Parsing accepts
//! canonical decimal strings (separator normalization happens earlier, in the
//! schema mapper); values with more than two fractional digits round half-up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale factor: two decimal places
pub const SCALE: i64 = 100;

/// Monetary value in integer cents
///
/// Signed so that intermediate values (raw file amounts before validation)
/// can be negative; the validator enforces the non-negative invariant for
/// accepted records. Display always shows exactly two fractional digits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

/// Errors produced when parsing a decimal string into [`Money`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid decimal format: '{0}'")]
    InvalidFormat(String),
    #[error("amount out of range: '{0}'")]
    OutOfRange(String),
}

impl Money {
    /// Zero cents
    pub const ZERO: Money = Money(0);

    /// Construct from a raw cent count
    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Raw cent count
    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on i64 overflow
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, MoneyError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (int_str, frac_str) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(MoneyError::InvalidFormat(s.to_string()));
        }
        if !int_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(MoneyError::InvalidFormat(s.to_string()));
        }

        let int_part: i64 = if int_str.is_empty() {
            0
        } else {
            int_str
                .parse()
                .map_err(|_| MoneyError::OutOfRange(s.to_string()))?
        };

        // Up to two fractional digits are exact; the third digit decides the
        // half-up rounding, anything beyond it is discarded.
        let frac_digits: Vec<u32> = frac_str.chars().filter_map(|c| c.to_digit(10)).collect();
        let mut frac_cents = match frac_digits.len() {
            0 => 0,
            1 => (frac_digits[0] * 10) as i64,
            _ => (frac_digits[0] * 10 + frac_digits[1]) as i64,
        };
        if frac_digits.len() > 2 && frac_digits[2] >= 5 {
            frac_cents += 1;
        }

        let magnitude = int_part
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac_cents))
            .ok_or_else(|| MoneyError::OutOfRange(s.to_string()))?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / SCALE as u64, abs % SCALE as u64)
    }
}
