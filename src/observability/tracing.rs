use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::types::exchange::Exchange;
use crate::types::ids::ReportId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Installs the global subscriber; `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    if let Err(e) = installed {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

pub fn trace_report(report_id: &ReportId) -> Span {
    tracing::info_span!(
        "funding_report",
        report_id = %report_id,
    )
}

pub fn trace_exchange(exchange: Exchange) -> Span {
    tracing::info_span!(
        "exchange",
        exchange = %exchange,
    )
}

pub fn trace_position(symbol: &str) -> Span {
    tracing::debug_span!(
        "position",
        symbol = %symbol,
    )
}
