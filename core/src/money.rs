//! Euro amounts in minor units and their display form.
//!
//! The API reports every amount as an integer `fractional` count of cents.
//! `Money` keeps that integer all the way through; conversion to major units
//! only happens when a value is shown or handed out as `f64`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A signed amount of euro cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn from_minor(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert a major-unit amount to cents, truncating toward zero.
    ///
    /// `0.29` becomes 28 cents because `0.29 * 100.0` is just below 29 in
    /// binary floating point.
    pub fn from_major(amount: f64) -> Self {
        Self((amount * 100.0) as i64)
    }

    pub fn minor(self) -> i64 {
        self.0
    }

    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// One participant's portion when splitting evenly across `parts`.
    ///
    /// Integer division: the remainder is dropped, so `parts` shares of the
    /// result can sum to less than `self`. Returns zero for zero parts.
    pub fn split_evenly(self, parts: usize) -> Self {
        match i64::try_from(parts) {
            Ok(0) | Err(_) => Self::zero(),
            Ok(parts) => Self(self.0 / parts),
        }
    }

    pub fn to_euro(self) -> String {
        self.to_string()
    }
}

/// `€1,234.50` / `-€1,234.50`, computed without floating point.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}€{}.{:02}",
            group_thousands(&(cents / 100).to_string()),
            cents % 100
        )
    }
}

/// Saturates at the `i64` bounds instead of overflowing.
impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc + m)
    }
}

/// Format a major-unit amount as euros with thousands separators.
///
/// The minus sign goes in front of the currency symbol: `-€5.00`, never
/// `€-5.00`. Negative zero formats as `€0.00`.
pub fn to_euro(amount: f64) -> String {
    let digits = group_decimal(&format!("{:.2}", amount.abs()));
    if amount < 0.0 {
        format!("-€{digits}")
    } else {
        format!("€{digits}")
    }
}

fn group_decimal(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((int, frac)) => format!("{}.{frac}", group_thousands(int)),
        None => group_thousands(formatted),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
