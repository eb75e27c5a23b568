use serde::Serialize;
use crate::events::balance::{BalanceSnapshot, WalletType};
use crate::types::balance::Balance;

/// One balance figure: which wallet to fetch and which flattened field to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceField {
    pub wallet: WalletType,
    pub path: &'static str,
}

impl BalanceField {
    pub const fn new(wallet: WalletType, path: &'static str) -> Self {
        BalanceField { wallet, path }
    }
}

/// How one exchange's balance responses map onto {futures, funding, total}.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EquityRule {
    pub futures: BalanceField,
    /// `None` when the venue has no separate funding wallet worth tracking.
    pub funding: Option<BalanceField>,
    /// Set when the futures figure excludes open unrealized PnL, which must
    /// then be added from the position valuations.
    pub add_unrealized_pnl: bool,
}

impl EquityRule {
    /// Wallets to fetch, each once, futures wallet first.
    pub fn wallets(&self) -> Vec<WalletType> {
        let mut wallets = vec![self.futures.wallet];
        if let Some(funding) = self.funding {
            if funding.wallet != self.futures.wallet {
                wallets.push(funding.wallet);
            }
        }
        wallets
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeEquity {
    pub futures_balance: Balance,
    pub funding_balance: Balance,
    pub total: Balance,
}

impl ExchangeEquity {
    pub fn zero() -> Self {
        ExchangeEquity::default()
    }
}

pub struct EquityAggregator;

impl EquityAggregator {
    /// Applies `rule` to the fetched snapshots. Missing snapshots or fields count as zero.
    pub fn aggregate(
        rule: &EquityRule,
        snapshots: &[BalanceSnapshot],
        unrealized_pnl: Balance,
    ) -> ExchangeEquity {
        let read = |field: &BalanceField| -> Balance {
            snapshots
                .iter()
                .find(|s| s.wallet == Some(field.wallet))
                .map(|s| Balance::new(s.field(field.path)))
                .unwrap_or_else(Balance::zero)
        };

        let futures_balance = read(&rule.futures);
        let funding_balance = rule.funding.as_ref().map(read).unwrap_or_else(Balance::zero);

        let mut total = futures_balance + funding_balance;
        if rule.add_unrealized_pnl {
            total = total + unrealized_pnl;
        }

        ExchangeEquity {
            futures_balance,
            funding_balance,
            total,
        }
    }

    pub fn total_equity<'a>(entries: impl IntoIterator<Item = &'a ExchangeEquity>) -> Balance {
        entries.into_iter().map(|e| e.total).sum()
    }
}
