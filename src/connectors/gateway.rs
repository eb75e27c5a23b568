use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use crate::config::exchanges::{ExchangeConfig, ExchangeCredentials};
use crate::error::{Error, Result};
use crate::events::balance::{BalanceSnapshot, WalletType};
use crate::events::funding::{AmountSource, FundingEvent};
use crate::interfaces::exchange_adapter::{ExchangeAdapter, PageRequest};
use crate::types::exchange::Exchange;
use crate::types::position::{Position, Side};
use crate::types::price::Price;
use crate::types::quantity::Quantity;
use crate::types::timestamp::Timestamp;

/// Talks to the connectivity gateway, which owns authentication, signing and
/// transport for every venue and exposes them under `/{exchange}/...`.
pub struct GatewayAdapter {
    exchange: Exchange,
    base_url: String,
    credentials: ExchangeCredentials,
    min_request_interval: Duration,
    client: Client,
}

impl GatewayAdapter {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(GatewayAdapter {
            exchange: config.exchange,
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
            min_request_interval: config.min_request_interval(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.exchange, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Api-Key", &self.credentials.api_key)
            .header("X-Api-Secret", &self.credentials.api_secret)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = self.authorized(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let body = self.send(self.client.get(self.url(path)).query(query)).await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::DeserializationError(format!("{} {}: {}", self.exchange, path, e)))
    }
}

#[async_trait]
impl ExchangeAdapter for GatewayAdapter {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    fn min_request_interval(&self) -> Duration {
        self.min_request_interval
    }

    async fn load_markets(&self) -> Result<()> {
        self.send(self.client.post(self.url("markets/load"))).await?;
        tracing::info!("Markets loaded via gateway: {}", self.exchange);
        Ok(())
    }

    async fn fetch_open_positions(&self) -> Result<Vec<Position>> {
        let raw: Vec<PositionDto> = self.get_json("positions", &[]).await?;
        Ok(raw.into_iter().map(|p| p.into_position(self.exchange)).collect())
    }

    async fn fetch_funding_history_page(
        &self,
        symbol: &str,
        request: &PageRequest,
    ) -> Result<Vec<FundingEvent>> {
        let mut query = vec![("symbol", symbol.to_string())];
        match request {
            PageRequest::TimeRange { start, end, limit } => {
                query.push(("startTime", start.as_millis().to_string()));
                query.push(("endTime", end.as_millis().to_string()));
                query.push(("limit", limit.to_string()));
            }
            PageRequest::Offset { offset, limit } => {
                query.push(("offset", offset.to_string()));
                query.push(("limit", limit.to_string()));
            }
            PageRequest::PageNumber { page, page_size } => {
                query.push(("page", page.to_string()));
                query.push(("pageSize", page_size.to_string()));
            }
        }

        let raw: Vec<FundingEntryDto> = self
            .get_json("funding", &query)
            .await
            .map_err(|e| match e {
                Error::DeserializationError(msg) => Error::MalformedPage(msg),
                other => other,
            })?;

        raw.into_iter()
            .map(|entry| entry.into_event(self.exchange, symbol))
            .collect()
    }

    async fn fetch_last_price(&self, symbol: &str) -> Result<Price> {
        let ticker: TickerDto = self
            .get_json("ticker", &[("symbol", symbol.to_string())])
            .await
            .map_err(|e| Error::TickerUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        ticker.last.map(Price::new).ok_or_else(|| Error::TickerUnavailable {
            symbol: symbol.to_string(),
            reason: "ticker has no last price".to_string(),
        })
    }

    async fn fetch_balance_snapshot(&self, wallet: WalletType) -> Result<BalanceSnapshot> {
        let raw: Value = self
            .get_json("balance", &[("wallet", wallet.to_string())])
            .await
            .map_err(|e| Error::BalanceUnavailable {
                exchange: self.exchange,
                reason: e.to_string(),
            })?;

        if !raw.is_object() {
            return Err(Error::BalanceUnavailable {
                exchange: self.exchange,
                reason: format!("{} balance is not an object", wallet),
            });
        }

        Ok(BalanceSnapshot::from_json(wallet, &raw))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionDto {
    symbol: String,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    contracts: Option<Decimal>,
    #[serde(default)]
    entry_price: Option<Decimal>,
    #[serde(default)]
    position_amt: Option<Decimal>,
}

impl PositionDto {
    fn into_position(self, exchange: Exchange) -> Position {
        let side = self.side.as_deref().and_then(|s| match s.to_ascii_lowercase().as_str() {
            "long" | "buy" => Some(Side::Long),
            "short" | "sell" => Some(Side::Short),
            _ => None,
        });

        // some venues only report a signed amount
        let size = self
            .contracts
            .or(self.position_amt)
            .map(|c| c.abs())
            .unwrap_or(Decimal::ZERO);

        Position {
            exchange,
            symbol: self.symbol,
            side,
            signed_amount: self.position_amt,
            size: Quantity::new(size),
            entry_price: Price::new(self.entry_price.unwrap_or(Decimal::ZERO)),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundingEntryDto {
    timestamp: i64,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    exec_fee: Option<Decimal>,
}

impl FundingEntryDto {
    fn into_event(self, exchange: Exchange, symbol: &str) -> Result<FundingEvent> {
        let (amount, raw_amount_source) = match (self.exec_fee, self.amount) {
            (Some(fee), _) => (fee, AmountSource::ExecFee),
            (None, Some(amount)) => (amount, AmountSource::Amount),
            (None, None) => {
                return Err(Error::MalformedPage(format!(
                    "{} {} funding entry at {} has no amount",
                    exchange, symbol, self.timestamp
                )));
            }
        };

        Ok(FundingEvent {
            exchange,
            symbol: symbol.to_string(),
            timestamp: Timestamp::from_millis(self.timestamp),
            amount,
            raw_amount_source,
        })
    }
}

#[derive(Deserialize)]
struct TickerDto {
    #[serde(default)]
    last: Option<Decimal>,
}
