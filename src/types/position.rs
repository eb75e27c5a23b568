use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::types::exchange::Exchange;
use crate::types::price::Price;
use crate::types::quantity::Quantity;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

/// An open derivatives position as reported by an exchange adapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub exchange: Exchange,
    pub symbol: String,
    /// Explicit side, when the venue reports one.
    pub side: Option<Side>,
    /// Raw signed position amount, used to infer the side when `side` is absent.
    pub signed_amount: Option<Decimal>,
    pub size: Quantity,
    pub entry_price: Price,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.size.is_positive()
    }

    pub fn abs_size(&self) -> Quantity {
        self.size.abs()
    }

    /// Explicit side first, then the sign of the raw amount.
    /// `None` when neither is available or the raw amount is zero.
    pub fn resolved_side(&self) -> Option<Side> {
        if let Some(side) = self.side {
            return Some(side);
        }

        match self.signed_amount {
            Some(amount) if amount > Decimal::ZERO => Some(Side::Long),
            Some(amount) if amount < Decimal::ZERO => Some(Side::Short),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(side: Option<Side>, signed_amount: Option<Decimal>) -> Position {
        Position {
            exchange: Exchange::Binance,
            symbol: "BTC/USDT:USDT".to_string(),
            side,
            signed_amount,
            size: Quantity::new(dec!(1)),
            entry_price: Price::new(dec!(100)),
        }
    }

    #[test]
    fn explicit_side_wins_over_sign() {
        let p = position(Some(Side::Long), Some(dec!(-3)));
        assert_eq!(p.resolved_side(), Some(Side::Long));
    }

    #[test]
    fn side_falls_back_to_sign_of_raw_amount() {
        assert_eq!(position(None, Some(dec!(2))).resolved_side(), Some(Side::Long));
        assert_eq!(position(None, Some(dec!(-2))).resolved_side(), Some(Side::Short));
        assert_eq!(position(None, None).resolved_side(), None);
    }

    #[test]
    fn zero_size_is_not_open() {
        let mut p = position(Some(Side::Short), None);
        p.size = Quantity::zero();
        assert!(!p.is_open());
    }
}
