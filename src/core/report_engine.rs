use chrono::FixedOffset;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use crate::config::FundingConfig;
use crate::connectors::profile::ExchangeProfile;
use crate::connectors::session::ExchangeSession;
use crate::error::{Error, Result};
use crate::events::balance::BalanceSnapshot;
use crate::funding::collector::FundingCollector;
use crate::funding::pagination::CollectionWindow;
use crate::funding::segmenter::{CyclePolicy, CycleSegmenter};
use crate::interfaces::clock::Clock;
use crate::interfaces::exchange_adapter::ExchangeAdapter;
use crate::observability::metrics::{REPORTS_FAILED, REPORTS_GENERATED, REPORT_LATENCY};
use crate::observability::tracing::{trace_exchange, trace_position, trace_report};
use crate::report::builder::ReportBuilder;
use crate::report::record::{Degradation, Operation, Report};
use crate::risk::valuator::{PositionValuator, Valuation};
use crate::settlement::equity::{EquityAggregator, ExchangeEquity};
use crate::types::balance::Balance;
use crate::types::exchange::Exchange;
use crate::types::ids::ReportId;
use crate::types::position::Position;

/// One configured exchange: its adapter and the conventions applied to it.
pub struct ExchangeSource {
    pub adapter: Arc<dyn ExchangeAdapter>,
    pub profile: ExchangeProfile,
    pub policy: CyclePolicy,
}

impl ExchangeSource {
    pub fn new(adapter: Arc<dyn ExchangeAdapter>, profile: ExchangeProfile, policy: CyclePolicy) -> Self {
        ExchangeSource { adapter, profile, policy }
    }

    pub fn exchange(&self) -> Exchange {
        self.profile.exchange
    }
}

pub struct ReportEngine {
    sources: Vec<ExchangeSource>,
    segmenter: CycleSegmenter,
    lookback: Duration,
    window: Duration,
    display_offset: FixedOffset,
    clock: Arc<dyn Clock>,
}

impl ReportEngine {
    pub fn new(sources: Vec<ExchangeSource>, config: &FundingConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        Ok(ReportEngine {
            sources,
            segmenter: CycleSegmenter::new(config.cycle_gap()),
            lookback: config.lookback(),
            window: config.window(),
            display_offset: config.display_offset()?,
            clock,
        })
    }

    /// Builds one report. Market loading or position listing failures abort
    /// the whole invocation; everything else degrades the affected fields.
    pub async fn run(&self) -> Result<Report> {
        let report_id = ReportId::new();
        let started = Instant::now();

        let result = self.generate().instrument(trace_report(&report_id)).await;
        REPORT_LATENCY.observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                REPORTS_GENERATED.inc();
                tracing::info!(
                    report_id = %report_id,
                    positions = report.position_records.len(),
                    degraded = report.degraded.len(),
                    total_equity = %report.total_equity,
                    "Funding report generated"
                );
            }
            Err(e) => {
                REPORTS_FAILED.inc();
                tracing::error!(report_id = %report_id, "Funding report failed: {}", e);
            }
        }

        result
    }

    async fn generate(&self) -> Result<Report> {
        let mut builder = ReportBuilder::new(self.display_offset);

        for source in &self.sources {
            self.report_exchange(source, &mut builder)
                .instrument(trace_exchange(source.exchange()))
                .await?;
        }

        Ok(builder.build())
    }

    async fn report_exchange(&self, source: &ExchangeSource, builder: &mut ReportBuilder) -> Result<()> {
        let exchange = source.exchange();
        let mut session = ExchangeSession::new(Arc::clone(&source.adapter), Arc::clone(&self.clock));

        session.load_markets().await.map_err(|e| Error::MarketLoadFailed {
            exchange,
            reason: e.to_string(),
        })?;

        let positions: Vec<Position> = session
            .open_positions()
            .await
            .map_err(|e| Error::PositionsUnavailable {
                exchange,
                reason: e.to_string(),
            })?
            .into_iter()
            .filter(|p| p.is_open())
            .collect();

        tracing::info!(exchange = %exchange, positions = positions.len(), "Open positions listed");

        let collector = FundingCollector::new(source.profile.pagination);
        let window = source.policy.collection_window(self.lookback, self.window);
        let mut unrealized_pnl = Balance::zero();

        for position in &positions {
            let valuation = self
                .report_position(&mut session, &collector, window, source, position, builder)
                .instrument(trace_position(&position.symbol))
                .await;
            unrealized_pnl = unrealized_pnl + valuation.unrealized_pnl;
        }

        let equity = self.exchange_equity(&mut session, &source.profile, unrealized_pnl, builder).await;
        builder.set_equity(exchange, equity);

        Ok(())
    }

    async fn report_position(
        &self,
        session: &mut ExchangeSession,
        collector: &FundingCollector,
        window: CollectionWindow,
        source: &ExchangeSource,
        position: &Position,
        builder: &mut ReportBuilder,
    ) -> Valuation {
        let exchange = source.exchange();
        let collection = collector
            .collect(session, &position.symbol, window, self.clock.now())
            .await;

        if let Some(reason) = collection.page_failure() {
            builder.degrade(Degradation {
                exchange,
                symbol: Some(position.symbol.clone()),
                operation: Operation::FetchFundingHistory,
                message: reason.to_string(),
            });
        }

        let events = self.segmenter.select(collection.events, source.policy);

        let valuation = match session.last_price(&position.symbol).await {
            Ok(price) => PositionValuator::valuate(position, price),
            Err(e) => {
                tracing::warn!(
                    exchange = %exchange,
                    symbol = %position.symbol,
                    operation = "fetch_last_price",
                    "Ticker unavailable, reporting zero valuation: {}",
                    e
                );
                builder.degrade(Degradation {
                    exchange,
                    symbol: Some(position.symbol.clone()),
                    operation: Operation::FetchLastPrice,
                    message: e.to_string(),
                });
                Valuation::unavailable()
            }
        };

        builder.add_position(position, &valuation, &events, &source.profile);
        valuation
    }

    /// Any failed wallet fetch zeroes the whole entry.
    async fn exchange_equity(
        &self,
        session: &mut ExchangeSession,
        profile: &ExchangeProfile,
        unrealized_pnl: Balance,
        builder: &mut ReportBuilder,
    ) -> ExchangeEquity {
        let mut snapshots: Vec<BalanceSnapshot> = Vec::new();

        for wallet in profile.equity_rule.wallets() {
            match session.balance(wallet).await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    tracing::warn!(
                        exchange = %profile.exchange,
                        wallet = %wallet,
                        operation = "fetch_balance_snapshot",
                        "Balance unavailable, equity entry zeroed: {}",
                        e
                    );
                    builder.degrade(Degradation {
                        exchange: profile.exchange,
                        symbol: None,
                        operation: Operation::FetchBalance,
                        message: e.to_string(),
                    });
                    return ExchangeEquity::zero();
                }
            }
        }

        EquityAggregator::aggregate(&profile.equity_rule, &snapshots, unrealized_pnl)
    }
}
