use std::{
    cmp::Ordering,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed amount expressed in the trip's **base currency** units.
///
/// Every value that reaches the settlement engine is already normalized to a
/// single unit (see [`Currency`](crate::Currency)). Shares of a split are not
/// rounded, so the value is a float; comparisons against zero go through a
/// tolerance band (see [`SETTLEMENT_EPSILON`](crate::SETTLEMENT_EPSILON)).
///
/// The value is signed:
/// - positive = the group owes this participant
/// - negative = this participant owes the group
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(90.0);
/// assert_eq!(amount.split(3).value(), 30.0);
/// assert_eq!((-amount).abs(), amount);
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().value(), 10.0);
/// assert_eq!("10,5".parse::<Amount>().unwrap().value(), 10.5);
/// assert!("1.2.3".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Creates a new amount.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn abs(self) -> Amount {
        Amount(self.0.abs())
    }

    #[must_use]
    pub fn min(self, other: Amount) -> Amount {
        Amount(self.0.min(other.0))
    }

    /// Returns `true` if the value is neither NaN nor infinite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Returns `true` if the amount lies within `epsilon` of zero.
    ///
    /// An exact zero is always settled, even with a zero tolerance.
    #[must_use]
    pub fn is_settled(self, epsilon: Amount) -> bool {
        self.0 == 0.0 || self.0.abs() < epsilon.0
    }

    /// Divides the amount into `parts` equal shares, without rounding.
    ///
    /// `parts` must be non-zero; callers skip empty split groups.
    #[must_use]
    pub fn split(self, parts: usize) -> Amount {
        Amount(self.0 / parts as f64)
    }

    /// Multiplies by an exchange rate.
    #[must_use]
    pub fn scale(self, factor: f64) -> Amount {
        Amount(self.0 * factor)
    }

    /// Total ordering, NaN sorts last.
    pub fn total_cmp(&self, other: &Amount) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(f, "{:.*}", precision, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Rejects empty strings, exponents, grouping separators and anything that
    /// is not a plain decimal number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s:?}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let whole = parts.next().ok_or_else(invalid)?;
        let frac = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if let Some(frac) = frac
            && !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let value: f64 = rest.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }

        Ok(Amount(if negative { -value } else { value }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_honours_precision() {
        assert_eq!(format!("{:.0}", Amount::new(49.6)), "50");
        assert_eq!(format!("{:.2}", Amount::new(10.5)), "10.50");
        assert_eq!(Amount::new(-3.25).to_string(), "-3.25");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap().value(), 10.0);
        assert_eq!("10.5".parse::<Amount>().unwrap().value(), 10.5);
        assert_eq!("10,50".parse::<Amount>().unwrap().value(), 10.5);
        assert_eq!("-0.01".parse::<Amount>().unwrap().value(), -0.01);
        assert_eq!("+1.00".parse::<Amount>().unwrap().value(), 1.0);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().value(), 2.3);
        assert_eq!("7.".parse::<Amount>().unwrap().value(), 7.0);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!("-".parse::<Amount>().is_err());
        assert!("1e5".parse::<Amount>().is_err());
        assert!("1.000.000".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!(".5".parse::<Amount>().is_err());
    }

    #[test]
    fn settled_band_is_exclusive() {
        let epsilon = Amount::new(1.0);
        assert!(Amount::new(0.999).is_settled(epsilon));
        assert!(Amount::new(-0.5).is_settled(epsilon));
        assert!(!Amount::new(1.0).is_settled(epsilon));
        assert!(!Amount::new(-1.5).is_settled(epsilon));
        assert!(Amount::ZERO.is_settled(Amount::ZERO));
        assert!(!Amount::new(0.001).is_settled(Amount::ZERO));
    }

    #[test]
    fn sum_folds_from_zero() {
        let total: Amount = [1.5, -0.5, 2.0].into_iter().map(Amount::new).sum();
        assert_eq!(total, Amount::new(3.0));
        let empty: Amount = std::iter::empty().sum();
        assert_eq!(empty, Amount::ZERO);
    }
}
