use thiserror::Error;
use crate::types::exchange::Exchange;

#[derive(Error, Debug)]
pub enum Error {
    // Exchange Adapter Errors
    #[error("Failed to load markets for {exchange}: {reason}")]
    MarketLoadFailed {
        exchange: Exchange,
        reason: String,
    },

    #[error("Open positions unavailable for {exchange}: {reason}")]
    PositionsUnavailable {
        exchange: Exchange,
        reason: String,
    },

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("Gateway returned status {status}: {body}")]
    Gateway {
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed page: {0}")]
    MalformedPage(String),

    #[error("Event deserialization failed: {0}")]
    DeserializationError(String),

    // Per-position / per-exchange degradations
    #[error("Ticker unavailable for {symbol}: {reason}")]
    TickerUnavailable {
        symbol: String,
        reason: String,
    },

    #[error("Balance unavailable for {exchange}: {reason}")]
    BalanceUnavailable {
        exchange: Exchange,
        reason: String,
    },

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
