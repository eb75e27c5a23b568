use rust_decimal::Decimal;
use std::time::Duration;
use crate::events::balance::WalletType;
use crate::funding::pagination::PaginationScheme;
use crate::settlement::equity::{BalanceField, EquityRule};
use crate::types::exchange::Exchange;

/// How a venue signs the funding amounts it reports.
///
/// The report's convention is holder income: positive when the position
/// received funding, negative when it paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingSign {
    /// Already positive for income.
    AsReported,
    /// Reported as a fee (positive when paid), so it is negated.
    Negated,
}

impl FundingSign {
    pub fn apply(&self, amount: Decimal) -> Decimal {
        match self {
            FundingSign::AsReported => amount,
            FundingSign::Negated => -amount,
        }
    }
}

/// Everything that differs between exchanges, in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeProfile {
    pub exchange: Exchange,
    pub funding_sign: FundingSign,
    pub equity_rule: EquityRule,
    pub pagination: PaginationScheme,
}

const BINANCE: ExchangeProfile = ExchangeProfile {
    exchange: Exchange::Binance,
    funding_sign: FundingSign::AsReported,
    // margin balance already carries unrealized pnl
    equity_rule: EquityRule {
        futures: BalanceField::new(WalletType::Derivatives, "totalMarginBalance"),
        funding: Some(BalanceField::new(WalletType::Spot, "USDT.free")),
        add_unrealized_pnl: false,
    },
    pagination: PaginationScheme::TimeCursor { limit: 1000 },
};

const PHEMEX: ExchangeProfile = ExchangeProfile {
    exchange: Exchange::Phemex,
    funding_sign: FundingSign::Negated,
    // account balance excludes open pnl
    equity_rule: EquityRule {
        futures: BalanceField::new(WalletType::Derivatives, "accountBalance"),
        funding: None,
        add_unrealized_pnl: true,
    },
    pagination: PaginationScheme::Offset { page_size: 200, max_offset: 1000 },
};

const BYBIT: ExchangeProfile = ExchangeProfile {
    exchange: Exchange::Bybit,
    funding_sign: FundingSign::Negated,
    // total equity already carries unrealized pnl
    equity_rule: EquityRule {
        futures: BalanceField::new(WalletType::Derivatives, "totalEquity"),
        funding: Some(BalanceField::new(WalletType::Funding, "USDT.walletBalance")),
        add_unrealized_pnl: false,
    },
    pagination: PaginationScheme::TimeWindow {
        span: Duration::from_secs(7 * 24 * 3600),
        limit: 1000,
    },
};

const MEXC: ExchangeProfile = ExchangeProfile {
    exchange: Exchange::Mexc,
    funding_sign: FundingSign::AsReported,
    equity_rule: EquityRule {
        futures: BalanceField::new(WalletType::Derivatives, "USDT.equity"),
        funding: None,
        add_unrealized_pnl: false,
    },
    pagination: PaginationScheme::PageNumber { page_size: 100, max_pages: 100 },
};

impl ExchangeProfile {
    pub fn for_exchange(exchange: Exchange) -> Self {
        match exchange {
            Exchange::Binance => BINANCE,
            Exchange::Phemex => PHEMEX,
            Exchange::Bybit => BYBIT,
            Exchange::Mexc => MEXC,
        }
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        if let Some(size) = page_size {
            self.pagination = self.pagination.with_page_size(size);
        }
        self
    }

    /// Signed sum of raw funding amounts in holder-income convention.
    pub fn normalized_funding<'a, I>(&self, amounts: I) -> Decimal
    where
        I: IntoIterator<Item = &'a Decimal>,
    {
        amounts
            .into_iter()
            .map(|a| self.funding_sign.apply(*a))
            .sum()
    }
}
