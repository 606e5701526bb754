use std::panic;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;

use crate::config::MemoryCfg;
use crate::errors::{EsError, EsErrorKind};
use crate::model::{AppendAck, EventRecord};
use crate::ring::RecordRing;

pub type EventSinkResult<T> = Result<T, EsError>;
pub type PostHook = Arc<dyn Fn(&EventRecord) + Send + Sync + 'static>;

/// Remote or local append-only store for event records.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn append(&self, record: EventRecord) -> EventSinkResult<AppendAck>;
}

/// Process-local sink used by tests, the CLI dry-run path, and offline development.
pub struct InMemoryEventStore {
    ring: RecordRing,
    hooks: HookRegistry,
    failure: RwLock<Option<EsErrorKind>>,
    drop_reason: RwLock<Option<String>>,
}

impl InMemoryEventStore {
    pub fn new(cfg: MemoryCfg) -> Arc<Self> {
        Arc::new(Self {
            ring: RecordRing::new(cfg.capacity),
            hooks: HookRegistry::default(),
            failure: RwLock::new(None),
            drop_reason: RwLock::new(None),
        })
    }

    pub fn register_post_hook(&self, hook: PostHook) {
        self.hooks.register(hook);
    }

    pub fn register_post_hook_fn<F>(&self, hook: F)
    where
        F: Fn(&EventRecord) + Send + Sync + 'static,
    {
        self.hooks.register(Arc::new(hook));
    }

    /// Makes every following append fail with `kind` until cleared with `None`.
    pub fn fail_with(&self, kind: Option<EsErrorKind>) {
        *self.failure.write() = kind;
    }

    /// Acknowledges every following append as dropped with `reason` without
    /// storing it, until cleared with `None`.
    pub fn drop_with(&self, reason: Option<String>) {
        *self.drop_reason.write() = reason;
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.ring.snapshot()
    }

    pub fn tail(&self, limit: usize) -> Vec<EventRecord> {
        self.ring.tail(limit)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventSink for InMemoryEventStore {
    async fn append(&self, record: EventRecord) -> EventSinkResult<AppendAck> {
        let failure = self.failure.read().clone();
        if let Some(kind) = failure {
            return Err(kind.into());
        }
        if record.user_id.as_str().trim().is_empty() {
            return Err(EsErrorKind::AppendRejected("user_id must not be empty".into()).into());
        }
        let drop_reason = self.drop_reason.read().clone();
        if let Some(reason) = drop_reason {
            return Ok(AppendAck::dropped(reason));
        }

        if self.ring.push(record.clone()) {
            warn!(target: "herald::event_store", "memory sink at capacity; evicted oldest record");
        }
        self.hooks.emit(&record);
        Ok(AppendAck::accepted())
    }
}

#[derive(Default)]
struct HookRegistry {
    hooks: RwLock<Vec<PostHook>>,
}

impl HookRegistry {
    fn register(&self, hook: PostHook) {
        self.hooks.write().push(hook);
    }

    fn emit(&self, record: &EventRecord) {
        let snapshot: Vec<PostHook> = self.hooks.read().iter().cloned().collect();
        for hook in snapshot {
            if panic::catch_unwind(panic::AssertUnwindSafe(|| (hook)(record))).is_err() {
                warn!(target: "herald::event_store", "post-hook panicked; continuing");
            }
        }
    }
}
