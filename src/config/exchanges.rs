use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use crate::funding::segmenter::CyclePolicy;
use crate::types::exchange::Exchange;

/// API credentials handed to one adapter at construction.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for ExchangeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeCredentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}***", visible)
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExchangeConfig {
    pub exchange: Exchange,
    pub gateway_url: String,
    #[serde(flatten)]
    pub credentials: ExchangeCredentials,
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub policy: CyclePolicy,
    /// Overrides the venue's default funding page size.
    #[serde(default)]
    pub page_size: Option<u32>,
}

fn default_min_request_interval_ms() -> u64 {
    500
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl ExchangeConfig {
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secret() {
        let credentials = ExchangeCredentials {
            api_key: "abcdefgh".to_string(),
            api_secret: "topsecret".to_string(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("abcd***"));
        assert!(!printed.contains("topsecret"));
    }
}
