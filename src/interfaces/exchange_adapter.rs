use async_trait::async_trait;
use std::time::Duration;
use crate::error::Result;
use crate::events::balance::{BalanceSnapshot, WalletType};
use crate::events::funding::FundingEvent;
use crate::types::exchange::Exchange;
use crate::types::position::Position;
use crate::types::price::Price;
use crate::types::timestamp::Timestamp;

/// Cursor parameters for one funding-history page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageRequest {
    TimeRange {
        start: Timestamp,
        end: Timestamp,
        limit: u32,
    },
    Offset {
        offset: u32,
        limit: u32,
    },
    PageNumber {
        page: u32,
        page_size: u32,
    },
}

/// Uniform contract over one exchange's connectivity layer.
///
/// `load_markets` must complete before any position or price query.
/// Callers are responsible for pacing successive calls by
/// `min_request_interval`; adapters do not sleep on their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    fn exchange(&self) -> Exchange;

    fn min_request_interval(&self) -> Duration;

    async fn load_markets(&self) -> Result<()>;

    /// May include flat positions; filtering to positive size is the caller's job.
    async fn fetch_open_positions(&self) -> Result<Vec<Position>>;

    async fn fetch_funding_history_page(
        &self,
        symbol: &str,
        request: &PageRequest,
    ) -> Result<Vec<FundingEvent>>;

    async fn fetch_last_price(&self, symbol: &str) -> Result<Price>;

    async fn fetch_balance_snapshot(&self, wallet: WalletType) -> Result<BalanceSnapshot>;
}
