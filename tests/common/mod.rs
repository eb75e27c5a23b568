#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use perp_funding_report::error::{Error, Result};
use perp_funding_report::events::balance::{BalanceSnapshot, WalletType};
use perp_funding_report::events::funding::{AmountSource, FundingEvent};
use perp_funding_report::interfaces::exchange_adapter::{ExchangeAdapter, PageRequest};
use perp_funding_report::types::exchange::Exchange;
use perp_funding_report::types::position::{Position, Side};
use perp_funding_report::types::price::Price;
use perp_funding_report::types::quantity::Quantity;
use perp_funding_report::types::timestamp::Timestamp;

pub const HOUR: i64 = 3_600_000;
/// 2024-03-01T00:00:00Z
pub const NOW: i64 = 1_709_251_200_000;

/// Scripted venue: serves its stored history through whatever cursor is asked for.
pub struct FakeExchange {
    exchange: Exchange,
    interval: Duration,
    markets_fail: bool,
    failing_page: Option<usize>,
    positions: Vec<Position>,
    history: HashMap<String, Vec<FundingEvent>>,
    prices: HashMap<String, Price>,
    balances: HashMap<WalletType, BalanceSnapshot>,
    requests: Mutex<Vec<PageRequest>>,
}

impl FakeExchange {
    pub fn new(exchange: Exchange) -> Self {
        FakeExchange {
            exchange,
            interval: Duration::ZERO,
            markets_fail: false,
            failing_page: None,
            positions: Vec::new(),
            history: HashMap::new(),
            prices: HashMap::new(),
            balances: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn failing_markets(mut self) -> Self {
        self.markets_fail = true;
        self
    }

    /// The `n`th funding page request (1-based) answers with a malformed page.
    pub fn failing_page(mut self, n: usize) -> Self {
        self.failing_page = Some(n);
        self
    }

    pub fn position(mut self, symbol: &str, side: Side, size: Decimal, entry: Decimal) -> Self {
        self.positions.push(Position {
            exchange: self.exchange,
            symbol: symbol.to_string(),
            side: Some(side),
            signed_amount: None,
            size: Quantity::new(size),
            entry_price: Price::new(entry),
        });
        self
    }

    /// `(hours before NOW, raw amount)` pairs, any order.
    pub fn funding(mut self, symbol: &str, entries: &[(i64, Decimal)]) -> Self {
        let mut events: Vec<FundingEvent> = entries
            .iter()
            .map(|(hours_ago, amount)| FundingEvent {
                exchange: self.exchange,
                symbol: symbol.to_string(),
                timestamp: Timestamp::from_millis(NOW - hours_ago * HOUR),
                amount: *amount,
                raw_amount_source: AmountSource::Amount,
            })
            .collect();
        events.sort_by_key(|e| e.timestamp);
        self.history.insert(symbol.to_string(), events);
        self
    }

    pub fn price(mut self, symbol: &str, last: Decimal) -> Self {
        self.prices.insert(symbol.to_string(), Price::new(last));
        self
    }

    pub fn balance(mut self, wallet: WalletType, fields: &[(&str, Decimal)]) -> Self {
        let snapshot = fields
            .iter()
            .fold(BalanceSnapshot::new(wallet), |s, (path, value)| s.with_field(path, *value));
        self.balances.insert(wallet, snapshot);
        self
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ExchangeAdapter for FakeExchange {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    fn min_request_interval(&self) -> Duration {
        self.interval
    }

    async fn load_markets(&self) -> Result<()> {
        if self.markets_fail {
            return Err(Error::Gateway { status: 503, body: "exchange maintenance".to_string() });
        }
        Ok(())
    }

    async fn fetch_open_positions(&self) -> Result<Vec<Position>> {
        Ok(self.positions.clone())
    }

    async fn fetch_funding_history_page(
        &self,
        symbol: &str,
        request: &PageRequest,
    ) -> Result<Vec<FundingEvent>> {
        let issued = match self.requests.lock() {
            Ok(mut requests) => {
                requests.push(request.clone());
                requests.len()
            }
            Err(_) => 0,
        };
        if self.failing_page == Some(issued) {
            return Err(Error::MalformedPage(format!("{} page {} truncated", symbol, issued)));
        }

        let history = self.history.get(symbol).cloned().unwrap_or_default();
        let page = match request {
            PageRequest::TimeRange { start, end, limit } => history
                .into_iter()
                .filter(|e| e.timestamp >= *start && e.timestamp <= *end)
                .take(*limit as usize)
                .collect(),
            PageRequest::Offset { offset, limit } => history
                .into_iter()
                .skip(*offset as usize)
                .take(*limit as usize)
                .collect(),
            PageRequest::PageNumber { page, page_size } => history
                .into_iter()
                .skip(((page - 1) * page_size) as usize)
                .take(*page_size as usize)
                .collect(),
        };
        Ok(page)
    }

    async fn fetch_last_price(&self, symbol: &str) -> Result<Price> {
        self.prices.get(symbol).copied().ok_or_else(|| Error::TickerUnavailable {
            symbol: symbol.to_string(),
            reason: "no ticker".to_string(),
        })
    }

    async fn fetch_balance_snapshot(&self, wallet: WalletType) -> Result<BalanceSnapshot> {
        self.balances.get(&wallet).cloned().ok_or_else(|| Error::BalanceUnavailable {
            exchange: self.exchange,
            reason: format!("{} wallet unreachable", wallet),
        })
    }
}
