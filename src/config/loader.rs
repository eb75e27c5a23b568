use crate::config::exchanges::ExchangeConfig;
use crate::config::FundingConfig;
use crate::error::{Error, Result};
use crate::observability::tracing::LogFormat;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub funding: FundingConfig,
    #[serde(default)]
    pub exchanges: Vec<ExchangeConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0:3000".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// `config/default`, then `config/{env}`, then `FUNDING__*` environment
    /// variables (e.g. `FUNDING__SERVER__BIND`).
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("FUNDING").separator("__"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        self.funding.validate()?;

        for (i, exchange) in self.exchanges.iter().enumerate() {
            if self.exchanges[..i].iter().any(|e| e.exchange == exchange.exchange) {
                return Err(Error::ConfigError(format!(
                    "exchange {} configured more than once",
                    exchange.exchange
                )));
            }
            if exchange.page_size == Some(0) {
                return Err(Error::ConfigError(format!(
                    "exchange {} page_size must be positive",
                    exchange.exchange
                )));
            }
            if exchange.gateway_url.trim().is_empty() {
                return Err(Error::ConfigError(format!(
                    "exchange {} has no gateway_url",
                    exchange.exchange
                )));
            }
        }

        Ok(())
    }
}
