mod common;

use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use common::{FakeExchange, NOW};
use perp_funding_report::config::FundingConfig;
use perp_funding_report::connectors::profile::ExchangeProfile;
use perp_funding_report::core::report_engine::{ExchangeSource, ReportEngine};
use perp_funding_report::error::Error;
use perp_funding_report::events::balance::WalletType;
use perp_funding_report::funding::segmenter::CyclePolicy;
use perp_funding_report::interfaces::exchange_adapter::ExchangeAdapter;
use perp_funding_report::report::record::Operation;
use perp_funding_report::types::balance::Balance;
use perp_funding_report::types::exchange::Exchange;
use perp_funding_report::types::position::Side;
use perp_funding_report::types::price::Price;
use perp_funding_report::types::quantity::Quantity;
use perp_funding_report::types::timestamp::Timestamp;
use perp_funding_report::utils::clock::ManualClock;

const BTC: &str = "BTC/USDT:USDT";
const ETH: &str = "ETH/USDT:USDT";

fn engine(venues: Vec<(FakeExchange, CyclePolicy)>) -> (ReportEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(NOW)));
    let sources = venues
        .into_iter()
        .map(|(fake, policy)| {
            let profile = ExchangeProfile::for_exchange(fake.exchange());
            ExchangeSource::new(Arc::new(fake), profile, policy)
        })
        .collect();
    let engine = ReportEngine::new(sources, &FundingConfig::default(), clock.clone())
        .expect("default config is valid");
    (engine, clock)
}

fn binance() -> FakeExchange {
    FakeExchange::new(Exchange::Binance)
        .position(BTC, Side::Long, dec!(2), dec!(100))
        // cycles of 3, 5 and 2 settlements
        .funding(BTC, &[
            (200, dec!(1)), (192, dec!(1)), (184, dec!(1)),
            (120, dec!(2)), (112, dec!(2)), (104, dec!(2)), (96, dec!(2)), (88, dec!(2)),
            (16, dec!(0.5)), (8, dec!(0.25)),
        ])
        .price(BTC, dec!(110))
        .balance(WalletType::Derivatives, &[("totalMarginBalance", dec!(1000))])
        .balance(WalletType::Spot, &[("USDT.free", dec!(50))])
}

#[tokio::test]
async fn latest_cycle_is_reported_with_valuation() {
    let (engine, _) = engine(vec![(binance(), CyclePolicy::LatestCycle)]);

    let report = engine.run().await.expect("report");

    assert_eq!(report.position_records.len(), 1);
    let record = &report.position_records[0];
    assert_eq!(record.symbol, "BTC");
    assert_eq!(record.count, 2);
    assert_eq!(record.total_funding, Balance::new(dec!(0.75)));
    assert_eq!(record.start_time.as_deref(), Some("29/02/2024, 4:00:00 pm"));
    assert_eq!(record.end_time.as_deref(), Some("01/03/2024, 12:00:00 am"));
    assert_eq!(record.current_price, Price::new(dec!(110)));
    assert_eq!(record.position_size, Quantity::new(dec!(2)));
    assert_eq!(record.unrealized_pnl, Balance::new(dec!(20)));
    assert_eq!(record.position_value, Balance::new(dec!(220)));

    assert_eq!(report.equity_overview[&Exchange::Binance].total, Balance::new(dec!(1050)));
    assert_eq!(report.total_equity, Balance::new(dec!(1050)));
    assert!(report.degraded.is_empty());
}

#[tokio::test]
async fn balance_failure_zeroes_only_that_exchange() {
    // funding wallet missing
    let bybit = FakeExchange::new(Exchange::Bybit)
        .position(ETH, Side::Short, dec!(1), dec!(3000))
        .funding(ETH, &[(8, dec!(0.3))])
        .price(ETH, dec!(3100))
        .balance(WalletType::Derivatives, &[("totalEquity", dec!(700))]);

    let (engine, _) = engine(vec![
        (binance(), CyclePolicy::LatestCycle),
        (bybit, CyclePolicy::LatestCycle),
    ]);

    let report = engine.run().await.expect("report");

    let bybit_equity = &report.equity_overview[&Exchange::Bybit];
    assert_eq!(bybit_equity.futures_balance, Balance::zero());
    assert_eq!(bybit_equity.funding_balance, Balance::zero());
    assert_eq!(bybit_equity.total, Balance::zero());
    assert_eq!(report.equity_overview[&Exchange::Binance].total, Balance::new(dec!(1050)));
    assert_eq!(report.total_equity, Balance::new(dec!(1050)));

    assert_eq!(report.degraded.len(), 1);
    assert_eq!(report.degraded[0].exchange, Exchange::Bybit);
    assert_eq!(report.degraded[0].operation, Operation::FetchBalance);

    // positions are still reported
    let eth = report
        .position_records
        .iter()
        .find(|r| r.source == Exchange::Bybit)
        .expect("bybit record");
    assert_eq!(eth.total_funding, Balance::new(dec!(-0.3)));
    assert_eq!(eth.unrealized_pnl, Balance::new(dec!(-100)));
}

#[tokio::test]
async fn empty_history_still_yields_a_record() {
    let mexc = FakeExchange::new(Exchange::Mexc)
        .position("SOL/USDT:USDT", Side::Long, dec!(10), dec!(100))
        .price("SOL/USDT:USDT", dec!(100))
        .balance(WalletType::Derivatives, &[("USDT.equity", dec!(300))]);

    let (engine, _) = engine(vec![(mexc, CyclePolicy::LatestCycle)]);
    let report = engine.run().await.expect("report");

    let record = &report.position_records[0];
    assert_eq!(record.symbol, "SOL");
    assert_eq!(record.count, 0);
    assert_eq!(record.total_funding, Balance::zero());
    assert!(record.start_time.is_none());
    assert!(record.end_time.is_none());
    assert_eq!(report.total_equity, Balance::new(dec!(300)));
}

#[tokio::test]
async fn ticker_failure_zeroes_valuation_and_is_flagged() {
    let phemex = FakeExchange::new(Exchange::Phemex)
        .position(BTC, Side::Long, dec!(1), dec!(60000))
        .position(ETH, Side::Short, dec!(1), dec!(50))
        .funding(ETH, &[(8, dec!(0.02))])
        .price(ETH, dec!(40))
        .balance(WalletType::Derivatives, &[("accountBalance", dec!(500))]);

    let (engine, _) = engine(vec![(phemex, CyclePolicy::LatestCycle)]);
    let report = engine.run().await.expect("report");

    let btc = &report.position_records[0];
    assert_eq!(btc.current_price, Price::zero());
    assert_eq!(btc.unrealized_pnl, Balance::zero());
    assert_eq!(btc.position_value, Balance::zero());

    let eth = &report.position_records[1];
    assert_eq!(eth.unrealized_pnl, Balance::new(dec!(10)));
    assert_eq!(eth.total_funding, Balance::new(dec!(-0.02)));

    // account balance excludes open pnl, so it is added back
    assert_eq!(report.equity_overview[&Exchange::Phemex].total, Balance::new(dec!(510)));

    assert_eq!(report.degraded.len(), 1);
    assert_eq!(report.degraded[0].operation, Operation::FetchLastPrice);
    assert_eq!(report.degraded[0].symbol.as_deref(), Some(BTC));
}

#[tokio::test]
async fn window_sum_counts_only_the_recent_window() {
    let bybit = FakeExchange::new(Exchange::Bybit)
        .position(ETH, Side::Long, dec!(1), dec!(3000))
        .funding(ETH, &[(30, dec!(0.1)), (20, dec!(0.1)), (12, dec!(0.1)), (4, dec!(0.1))])
        .price(ETH, dec!(3000))
        .balance(WalletType::Derivatives, &[("totalEquity", dec!(100))])
        .balance(WalletType::Funding, &[("USDT.walletBalance", dec!(25))]);

    let (engine, _) = engine(vec![(bybit, CyclePolicy::WindowSum)]);
    let report = engine.run().await.expect("report");

    let record = &report.position_records[0];
    assert_eq!(record.count, 3);
    assert_eq!(record.total_funding, Balance::new(dec!(-0.3)));
    assert_eq!(report.total_equity, Balance::new(dec!(125)));
}

#[tokio::test]
async fn failed_page_keeps_earlier_events_and_is_flagged() {
    let phemex = FakeExchange::new(Exchange::Phemex)
        .position(BTC, Side::Long, dec!(1), dec!(100))
        .funding(BTC, &[(40, dec!(0.1)), (32, dec!(0.2)), (24, dec!(0.3)), (16, dec!(0.4))])
        .price(BTC, dec!(100))
        .balance(WalletType::Derivatives, &[("accountBalance", dec!(10))])
        .failing_page(2);

    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(NOW)));
    let profile = ExchangeProfile::for_exchange(Exchange::Phemex).with_page_size(Some(2));
    let source = ExchangeSource::new(Arc::new(phemex), profile, CyclePolicy::LatestCycle);
    let engine = ReportEngine::new(vec![source], &FundingConfig::default(), clock).expect("engine");

    let report = engine.run().await.expect("report");

    // only the first page of two events made it
    let record = &report.position_records[0];
    assert_eq!(record.count, 2);
    assert_eq!(record.total_funding, Balance::new(dec!(-0.3)));

    assert_eq!(report.degraded.len(), 1);
    let degraded = &report.degraded[0];
    assert_eq!(degraded.exchange, Exchange::Phemex);
    assert_eq!(degraded.operation, Operation::FetchFundingHistory);
    assert_eq!(degraded.symbol.as_deref(), Some(BTC));
    assert!(degraded.message.contains("truncated"));
}

#[tokio::test]
async fn flat_positions_are_skipped() {
    let mexc = FakeExchange::new(Exchange::Mexc)
        .position("DOGE/USDT:USDT", Side::Long, dec!(0), dec!(0.1))
        .balance(WalletType::Derivatives, &[("USDT.equity", dec!(12))]);

    let (engine, _) = engine(vec![(mexc, CyclePolicy::LatestCycle)]);
    let report = engine.run().await.expect("report");

    assert!(report.position_records.is_empty());
    assert_eq!(report.total_equity, Balance::new(dec!(12)));
}

#[tokio::test]
async fn market_load_failure_aborts_the_report() {
    let mexc = FakeExchange::new(Exchange::Mexc).failing_markets();
    let (engine, _) = engine(vec![
        (binance(), CyclePolicy::LatestCycle),
        (mexc, CyclePolicy::LatestCycle),
    ]);

    let err = engine.run().await.expect_err("fatal");

    assert!(matches!(err, Error::MarketLoadFailed { exchange: Exchange::Mexc, .. }));
}

#[tokio::test]
async fn every_adapter_call_is_paced() {
    let venue = binance().interval(Duration::from_millis(200));
    let (engine, clock) = engine(vec![(venue, CyclePolicy::LatestCycle)]);

    engine.run().await.expect("report");

    // markets, positions, two funding pages, ticker, two wallets
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(200); 6]);
}
