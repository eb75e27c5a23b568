use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::fmt;

/// Signed amount in the report's unit of account (USDT).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Balance(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Balance {
    pub fn new(value: Decimal) -> Self {
        Balance(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Balance(Decimal::ZERO)
    }

    pub fn abs(&self) -> Self {
        Balance(self.0.abs())
    }
}

impl From<Decimal> for Balance {
    fn from(value: Decimal) -> Self {
        Balance(value)
    }
}

impl Add for Balance {
    type Output = Balance;
    fn add(self, other: Balance) -> Balance {
        Balance(self.0 + other.0)
    }
}

impl Sub for Balance {
    type Output = Balance;
    fn sub(self, other: Balance) -> Balance {
        Balance(self.0 - other.0)
    }
}

impl Neg for Balance {
    type Output = Balance;
    fn neg(self) -> Balance {
        Balance(-self.0)
    }
}

impl Sum for Balance {
    fn sum<I: Iterator<Item = Balance>>(iter: I) -> Self {
        iter.fold(Balance::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Balance> for Balance {
    fn sum<I: Iterator<Item = &'a Balance>>(iter: I) -> Self {
        iter.fold(Balance::zero(), |acc, x| acc + *x)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
