use serde::Serialize;
use crate::types::balance::Balance;
use crate::types::position::{Position, Side};
use crate::types::price::Price;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub unrealized_pnl: Balance,
    pub position_value: Balance,
    pub current_price: Price,
}

impl Valuation {
    /// Stand-in used when the ticker could not be fetched.
    pub fn unavailable() -> Self {
        Valuation::default()
    }
}

pub struct PositionValuator;

impl PositionValuator {
    /// Mark-to-market at `current_price`.
    /// value = |size| * price; long pnl = (price - entry) * |size|, short is mirrored.
    pub fn valuate(position: &Position, current_price: Price) -> Valuation {
        let size = position.abs_size();

        let side = position.resolved_side().unwrap_or_else(|| {
            tracing::warn!(
                exchange = %position.exchange,
                symbol = %position.symbol,
                "Position side unknown, valuing as long"
            );
            Side::Long
        });

        let pnl_per_contract = match side {
            Side::Long => current_price - position.entry_price,
            Side::Short => position.entry_price - current_price,
        };

        Valuation {
            unrealized_pnl: size * pnl_per_contract,
            position_value: size * current_price,
            current_price,
        }
    }
}
