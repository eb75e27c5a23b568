use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::types::exchange::Exchange;
use crate::types::timestamp::Timestamp;

/// Which raw field of the exchange record supplied `amount`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmountSource {
    Amount,
    ExecFee,
}

/// One funding cash flow, with the amount exactly as the exchange reported it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundingEvent {
    pub exchange: Exchange,
    pub symbol: String,
    pub timestamp: Timestamp,
    pub amount: Decimal,
    pub raw_amount_source: AmountSource,
}

/// Identity of a funding event across pages of one collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub exchange: Exchange,
    pub symbol: String,
    pub timestamp: Timestamp,
    pub amount: Decimal,
}

impl FundingEvent {
    pub fn key(&self) -> EventKey {
        EventKey {
            exchange: self.exchange,
            symbol: self.symbol.clone(),
            timestamp: self.timestamp,
            // 1.50 and 1.5 are the same amount
            amount: self.amount.normalize(),
        }
    }
}
