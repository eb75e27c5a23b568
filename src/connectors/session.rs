use std::sync::Arc;
use crate::connectors::pacer::RequestPacer;
use crate::error::Result;
use crate::events::balance::{BalanceSnapshot, WalletType};
use crate::events::funding::FundingEvent;
use crate::interfaces::clock::Clock;
use crate::interfaces::exchange_adapter::{ExchangeAdapter, PageRequest};
use crate::observability::metrics::ADAPTER_REQUESTS;
use crate::types::exchange::Exchange;
use crate::types::position::Position;
use crate::types::price::Price;

/// An adapter plus its pacer: every call made through a session honours the
/// adapter's advertised request interval.
pub struct ExchangeSession {
    adapter: Arc<dyn ExchangeAdapter>,
    pacer: RequestPacer,
}

impl ExchangeSession {
    pub fn new(adapter: Arc<dyn ExchangeAdapter>, clock: Arc<dyn Clock>) -> Self {
        let pacer = RequestPacer::new(adapter.min_request_interval(), clock);
        ExchangeSession { adapter, pacer }
    }

    pub fn exchange(&self) -> Exchange {
        self.adapter.exchange()
    }

    async fn paced(&mut self, operation: &'static str) {
        self.pacer.wait_turn().await;
        ADAPTER_REQUESTS
            .with_label_values(&[self.adapter.exchange().as_str(), operation])
            .inc();
    }

    pub async fn load_markets(&mut self) -> Result<()> {
        self.paced("load_markets").await;
        self.adapter.load_markets().await
    }

    pub async fn open_positions(&mut self) -> Result<Vec<Position>> {
        self.paced("fetch_open_positions").await;
        self.adapter.fetch_open_positions().await
    }

    pub async fn funding_page(
        &mut self,
        symbol: &str,
        request: &PageRequest,
    ) -> Result<Vec<FundingEvent>> {
        self.paced("fetch_funding_history_page").await;
        self.adapter.fetch_funding_history_page(symbol, request).await
    }

    pub async fn last_price(&mut self, symbol: &str) -> Result<Price> {
        self.paced("fetch_last_price").await;
        self.adapter.fetch_last_price(symbol).await
    }

    pub async fn balance(&mut self, wallet: WalletType) -> Result<BalanceSnapshot> {
        self.paced("fetch_balance_snapshot").await;
        self.adapter.fetch_balance_snapshot(wallet).await
    }
}
