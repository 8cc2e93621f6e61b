//! Money value object in integer minor currency units.
//!
//! Amounts are whole yen (or cents). No floating point is involved anywhere in
//! the ledger, so balances sum to exactly zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use super::ValidationError;

/// Signed amount in minor currency units.
///
/// Payments are always positive; balances may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Wraps a raw minor-unit value.
    pub const fn from_minor(value: i64) -> Self {
        Self(value)
    }

    /// Creates a strictly positive amount, as required for payments.
    pub fn positive(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::not_positive("amount", value));
        }
        Ok(Self(value))
    }

    /// Returns the raw minor-unit value.
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// True if `|self| <= tolerance`.
    pub fn is_within(&self, tolerance: Money) -> bool {
        self.0.abs() <= tolerance.0.abs()
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Splits this amount into `parts` shares using the largest-remainder method.
    ///
    /// Every share is `self / parts`, and the first `self % parts` shares get
    /// one extra unit. The shares always sum back to `self`. Returns an empty
    /// vector when `parts` is zero.
    pub fn split_evenly(self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let n = parts as i64;
        let base = self.0.div_euclid(n);
        let remainder = self.0.rem_euclid(n) as usize;

        (0..parts)
            .map(|i| if i < remainder { Money(base + 1) } else { Money(base) })
            .collect()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(Money::positive(0).is_err());
        assert!(Money::positive(-100).is_err());
        assert_eq!(Money::positive(1).unwrap().minor_units(), 1);
    }

    #[test]
    fn split_evenly_without_remainder() {
        let shares = Money::from_minor(3000).split_evenly(3);
        assert_eq!(shares, vec![Money::from_minor(1000); 3]);
    }

    #[test]
    fn split_evenly_hands_remainder_to_first_shares() {
        let shares = Money::from_minor(1000).split_evenly(3);
        assert_eq!(
            shares,
            vec![
                Money::from_minor(334),
                Money::from_minor(333),
                Money::from_minor(333)
            ]
        );
        assert_eq!(shares.iter().sum::<Money>(), Money::from_minor(1000));
    }

    #[test]
    fn split_evenly_smaller_than_parts() {
        let shares = Money::from_minor(2).split_evenly(5);
        assert_eq!(shares.iter().filter(|s| s.is_positive()).count(), 2);
        assert_eq!(shares.iter().sum::<Money>(), Money::from_minor(2));
    }

    #[test]
    fn split_evenly_zero_parts_is_empty() {
        assert!(Money::from_minor(100).split_evenly(0).is_empty());
    }

    #[test]
    fn is_within_uses_absolute_value() {
        assert!(Money::from_minor(-1).is_within(Money::from_minor(1)));
        assert!(!Money::from_minor(-2).is_within(Money::from_minor(1)));
        assert!(Money::ZERO.is_within(Money::ZERO));
    }

    #[test]
    fn arithmetic_operators() {
        let mut m = Money::from_minor(500);
        m += Money::from_minor(250);
        m -= Money::from_minor(100);
        assert_eq!(m, Money::from_minor(650));
        assert_eq!(-m, Money::from_minor(-650));
    }
}
