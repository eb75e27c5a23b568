use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use crate::settlement::equity::ExchangeEquity;
use crate::types::balance::Balance;
use crate::types::exchange::Exchange;
use crate::types::price::Price;
use crate::types::quantity::Quantity;

/// One open position and the funding of its current period.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub source: Exchange,
    pub symbol: String,
    pub current_price: Price,
    pub position_size: Quantity,
    pub position_value: Balance,
    pub unrealized_pnl: Balance,
    pub count: usize,
    /// Holder income: positive when received.
    pub total_funding: Balance,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchFundingHistory,
    FetchLastPrice,
    FetchBalance,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchFundingHistory => "fetch_funding_history",
            Operation::FetchLastPrice => "fetch_last_price",
            Operation::FetchBalance => "fetch_balance",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable failure whose affected fields were zeroed or cut short.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Degradation {
    pub exchange: Exchange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub operation: Operation,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub position_records: Vec<PositionRecord>,
    pub equity_overview: BTreeMap<Exchange, ExchangeEquity>,
    pub total_equity: Balance,
    pub degraded: Vec<Degradation>,
}
