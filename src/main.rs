use anyhow::Context;
use std::sync::Arc;
use perp_funding_report::api::rest::{create_router, ApiState};
use perp_funding_report::config::exchanges::ExchangeConfig;
use perp_funding_report::config::loader::AppConfig;
use perp_funding_report::connectors::gateway::GatewayAdapter;
use perp_funding_report::connectors::profile::ExchangeProfile;
use perp_funding_report::core::report_engine::{ExchangeSource, ReportEngine};
use perp_funding_report::error::Result;
use perp_funding_report::observability::metrics::register_metrics;
use perp_funding_report::observability::tracing::init_tracing;
use perp_funding_report::utils::clock::SystemClock;

fn build_source(config: &ExchangeConfig) -> Result<ExchangeSource> {
    let adapter = GatewayAdapter::new(config)?;
    let profile = ExchangeProfile::for_exchange(config.exchange).with_page_size(config.page_size);
    Ok(ExchangeSource::new(Arc::new(adapter), profile, config.policy))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    init_tracing(config.server.log_format);
    register_metrics()?;

    let sources = config
        .exchanges
        .iter()
        .map(build_source)
        .collect::<Result<Vec<_>>>()?;

    for source in &sources {
        tracing::info!(
            exchange = %source.exchange(),
            policy = ?source.policy,
            pagination = ?source.profile.pagination,
            "Exchange configured"
        );
    }

    let engine = ReportEngine::new(sources, &config.funding, Arc::new(SystemClock))?;
    let state = Arc::new(ApiState { engine: Arc::new(engine) });

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    tracing::info!("Funding report service listening on {}", config.server.bind);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
