use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use crate::error::Result;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Adapter metrics
    pub static ref ADAPTER_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("adapter_requests_total", "Paced requests issued to exchange adapters"),
        &["exchange", "operation"]
    ).expect("metric can be created");

    // Collection metrics
    pub static ref FUNDING_PAGES_FETCHED: IntCounterVec = IntCounterVec::new(
        Opts::new("funding_pages_fetched_total", "Funding history pages fetched"),
        &["exchange"]
    ).expect("metric can be created");

    pub static ref FUNDING_EVENTS_COLLECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("funding_events_collected_total", "Unique funding events collected"),
        &["exchange"]
    ).expect("metric can be created");

    pub static ref FUNDING_DUPLICATES_DROPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("funding_duplicates_dropped_total", "Funding events dropped as duplicates"),
        &["exchange"]
    ).expect("metric can be created");

    // Report metrics
    pub static ref REPORTS_GENERATED: IntCounter = IntCounter::new(
        "reports_generated_total",
        "Reports completed"
    ).expect("metric can be created");

    pub static ref REPORTS_FAILED: IntCounter = IntCounter::new(
        "reports_failed_total",
        "Reports aborted by a fatal error"
    ).expect("metric can be created");

    pub static ref DEGRADATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("report_degradations_total", "Recoverable failures absorbed into a report"),
        &["exchange", "operation"]
    ).expect("metric can be created");

    pub static ref REPORT_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "report_latency_seconds",
            "End-to-end report generation latency"
        ).buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0])
    ).expect("metric can be created");
}

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(ADAPTER_REQUESTS.clone()))?;
    REGISTRY.register(Box::new(FUNDING_PAGES_FETCHED.clone()))?;
    REGISTRY.register(Box::new(FUNDING_EVENTS_COLLECTED.clone()))?;
    REGISTRY.register(Box::new(FUNDING_DUPLICATES_DROPPED.clone()))?;
    REGISTRY.register(Box::new(REPORTS_GENERATED.clone()))?;
    REGISTRY.register(Box::new(REPORTS_FAILED.clone()))?;
    REGISTRY.register(Box::new(DEGRADATIONS.clone()))?;
    REGISTRY.register(Box::new(REPORT_LATENCY.clone()))?;
    Ok(())
}

/// Prometheus text exposition of everything in `REGISTRY`.
pub fn render() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
