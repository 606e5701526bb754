use herald_core_types::EventType;
use lazy_static::lazy_static;
use prometheus::{core::Collector, IntCounterVec, Registry};
use tracing::error;

lazy_static! {
    static ref TRACKER_EVENTS_TOTAL: IntCounterVec = IntCounterVec::new(
        prometheus::Opts::new(
            "herald_tracker_events_total",
            "Tracked events by type and submission outcome"
        ),
        &["event_type", "outcome"]
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register tracker metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, TRACKER_EVENTS_TOTAL.clone());
}

fn record(event_type: EventType, outcome: &str) {
    TRACKER_EVENTS_TOTAL
        .with_label_values(&[event_type.as_str(), outcome])
        .inc();
}

pub fn record_submitted(event_type: EventType) {
    record(event_type, "submitted");
}

pub fn record_dropped(event_type: EventType) {
    record(event_type, "dropped");
}

pub fn record_failed(event_type: EventType) {
    record(event_type, "failed");
}

pub fn record_skipped_anonymous(event_type: EventType) {
    record(event_type, "skipped");
}

pub fn outcome_count(event_type: EventType, outcome: &str) -> u64 {
    TRACKER_EVENTS_TOTAL
        .with_label_values(&[event_type.as_str(), outcome])
        .get()
}
