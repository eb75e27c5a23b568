use crate::types::balance::Balance;
use crate::types::price::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

/// Position size in contracts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Self {
        Quantity(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Quantity(Decimal::ZERO)
    }

    pub fn abs(&self) -> Self {
        Quantity(self.0.abs())
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Quantity(value)
    }
}

impl Mul<Price> for Quantity {
    type Output = Balance;
    fn mul(self, price: Price) -> Balance {
        Balance::new(self.0 * price.value())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
