use lazy_static::lazy_static;
use prometheus::{core::Collector, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use tracing::error;

lazy_static! {
    static ref INSIGHT_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "herald_insight_requests_total",
            "Insight generation requests by outcome"
        ),
        &["outcome"]
    )
    .unwrap();
    static ref INSIGHT_UPSTREAM_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "herald_insight_upstream_seconds",
            "Latency of upstream chat-completion calls"
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["status"]
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register insight metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, INSIGHT_REQUESTS_TOTAL.clone());
    register(registry, INSIGHT_UPSTREAM_SECONDS.clone());
}

/// `outcome` is a decode stage (`strict`, `extracted`, `fallback`) or an error label.
pub fn record_request(outcome: &str) {
    INSIGHT_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn observe_upstream(status: &str, seconds: f64) {
    INSIGHT_UPSTREAM_SECONDS
        .with_label_values(&[status])
        .observe(seconds);
}

pub fn request_count(outcome: &str) -> u64 {
    INSIGHT_REQUESTS_TOTAL.with_label_values(&[outcome]).get()
}
