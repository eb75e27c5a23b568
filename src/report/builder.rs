use chrono::FixedOffset;
use std::collections::BTreeMap;
use crate::connectors::profile::ExchangeProfile;
use crate::events::funding::FundingEvent;
use crate::observability::metrics::DEGRADATIONS;
use crate::report::record::{Degradation, PositionRecord, Report};
use crate::risk::valuator::Valuation;
use crate::settlement::equity::{EquityAggregator, ExchangeEquity};
use crate::types::balance::Balance;
use crate::types::exchange::Exchange;
use crate::types::position::Position;
use crate::utils::helper::display_symbol;

/// Accumulates one invocation's records; consumed by `build`.
pub struct ReportBuilder {
    display_offset: FixedOffset,
    records: Vec<PositionRecord>,
    equity: BTreeMap<Exchange, ExchangeEquity>,
    degraded: Vec<Degradation>,
}

impl ReportBuilder {
    pub fn new(display_offset: FixedOffset) -> Self {
        ReportBuilder {
            display_offset,
            records: Vec::new(),
            equity: BTreeMap::new(),
            degraded: Vec::new(),
        }
    }

    /// `events` is the selected cycle or window, ascending. An empty set
    /// still yields a record with zero count and funding.
    pub fn add_position(
        &mut self,
        position: &Position,
        valuation: &Valuation,
        events: &[FundingEvent],
        profile: &ExchangeProfile,
    ) -> &PositionRecord {
        let total_funding = Balance::new(
            profile.normalized_funding(events.iter().map(|e| &e.amount)),
        );

        self.records.push(PositionRecord {
            source: position.exchange,
            symbol: display_symbol(&position.symbol).to_string(),
            current_price: valuation.current_price,
            position_size: position.abs_size(),
            position_value: valuation.position_value,
            unrealized_pnl: valuation.unrealized_pnl,
            count: events.len(),
            total_funding,
            start_time: events.first().map(|e| e.timestamp.to_display(self.display_offset)),
            end_time: events.last().map(|e| e.timestamp.to_display(self.display_offset)),
        });

        &self.records[self.records.len() - 1]
    }

    pub fn set_equity(&mut self, exchange: Exchange, equity: ExchangeEquity) {
        self.equity.insert(exchange, equity);
    }

    pub fn degrade(&mut self, degradation: Degradation) {
        DEGRADATIONS
            .with_label_values(&[degradation.exchange.as_str(), degradation.operation.as_str()])
            .inc();
        self.degraded.push(degradation);
    }

    pub fn build(self) -> Report {
        let total_equity = EquityAggregator::total_equity(self.equity.values());

        Report {
            position_records: self.records,
            equity_overview: self.equity,
            total_equity,
            degraded: self.degraded,
        }
    }
}
