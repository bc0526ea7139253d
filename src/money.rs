//! Currency amounts shown in the cart table.
//!
//! DESIGN
//! ======
//! Amounts are held as integer cents so the cart total is an exact sum of the
//! displayed subtotals. Formatting always renders two decimals with a leading
//! `$`, the same text the server templates produce.

#[cfg(test)]
#[path = "money_test.rs"]
mod money_test;

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Largest float magnitude accepted by [`Money::from_f64`], in cents.
const MAX_FLOAT_CENTS: f64 = 9.0e15;

/// A currency amount in cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Self = Self { cents: 0 };

    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.cents
    }

    /// Convert a server-provided decimal amount, rounding to the nearest cent.
    ///
    /// Returns `None` for NaN, infinities and magnitudes beyond what cents
    /// can represent exactly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_f64(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > MAX_FLOAT_CENTS {
            return None;
        }
        Some(Self { cents: cents as i64 })
    }

    /// Parse display text such as `$1,234.50`, `12.5` or `-$3.00`.
    ///
    /// More than two fractional digits are rounded half away from zero.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut rest = text.trim();
        let mut negative = false;
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped.trim_start();
        }
        if let Some(stripped) = rest.strip_prefix('$') {
            rest = stripped.trim_start();
        }
        if !negative {
            if let Some(stripped) = rest.strip_prefix('-') {
                negative = true;
                rest = stripped;
            }
        }

        let (whole, frac) = match rest.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (rest, ""),
        };
        if whole.starts_with(',') || whole.ends_with(',') || whole.contains(",,") {
            return None;
        }
        let whole: String = whole.chars().filter(|c| *c != ',').collect();
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            match whole.parse() {
                Ok(units) => units,
                Err(_) => return None,
            }
        };
        let mut digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        let mut cents = units.checked_mul(100)?.checked_add(tenths * 10 + hundredths)?;
        if round_up {
            cents = cents.checked_add(1)?;
        }
        Some(Self { cents: if negative { -cents } else { cents } })
    }

    /// Parse a subtotal cell, counting malformed text as zero.
    ///
    /// A single unreadable cell must not blank out the whole total, so the
    /// failure is logged and the cell contributes nothing.
    #[must_use]
    pub fn parse_or_zero(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|| {
            log::warn!("unparsable currency text {text:?}; counting as zero");
            Self::ZERO
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { cents: self.cents.saturating_add(rhs.cents) }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
