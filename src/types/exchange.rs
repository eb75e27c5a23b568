use serde::{Deserialize, Serialize};
use std::fmt;

/// The derivatives venues a report is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Binance,
    Phemex,
    Bybit,
    Mexc,
}

impl Exchange {
    pub const ALL: [Exchange; 4] = [
        Exchange::Binance,
        Exchange::Phemex,
        Exchange::Bybit,
        Exchange::Mexc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Binance => "binance",
            Exchange::Phemex => "phemex",
            Exchange::Bybit => "bybit",
            Exchange::Mexc => "mexc",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
