use std::sync::Arc;

use chrono::SecondsFormat;
use herald_core_types::{AdAction, EventType, PostAction};
use herald_event_store::{EventData, EventRecord, EventSink};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::context::{ActorResolver, AuthState, BrowserContext, MonotonicClock, NavigationContext};
use crate::metrics;
use crate::session::SessionContext;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker requires a tokio runtime; build it inside one or pass a handle")]
    NoRuntime,
}

/// Fire-and-forget dispatcher for engagement events.
///
/// Every `track_*` call returns immediately. The record is built on the
/// calling thread (so its timestamp is the submission instant) and the sink
/// append runs on a detached task.
#[derive(Clone)]
pub struct Tracker {
    sink: Arc<dyn EventSink>,
    actor: Arc<dyn ActorResolver>,
    navigation: Arc<dyn NavigationContext>,
    session: Arc<SessionContext>,
    clock: Arc<MonotonicClock>,
    runtime: Handle,
}

impl Tracker {
    pub fn builder(sink: Arc<dyn EventSink>) -> TrackerBuilder {
        TrackerBuilder::new(sink)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Submits one event. Silently does nothing when no actor is signed in.
    pub fn track_event(&self, event_type: EventType, event_data: EventData) {
        let Some(record) = self.build_record(event_type, event_data) else {
            return;
        };
        self.submit(record);
    }

    /// Enriches `event_data` with ambient context. Returns `None` for anonymous
    /// or blank actors.
    pub fn build_record(&self, event_type: EventType, event_data: EventData) -> Option<EventRecord> {
        let actor = self
            .actor
            .current_actor()
            .filter(|actor| !actor.as_str().trim().is_empty());
        let Some(user_id) = actor else {
            debug!(
                target: "herald::tracker",
                event_type = %event_type,
                "no authenticated actor; event not recorded"
            );
            metrics::record_skipped_anonymous(event_type);
            return None;
        };

        let page = self.navigation.page();
        let session_id = self.session.session_id();
        let timestamp = self
            .clock
            .tick()
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut data = event_data;
        data.insert("url", page.url);
        data.insert("referrer", page.referrer);
        data.insert("user_agent", page.user_agent);
        data.insert("timestamp", timestamp);
        data.insert("session_id", session_id.as_str());

        Some(EventRecord {
            user_id,
            event_type,
            event_data: data,
            session_id,
        })
    }

    fn submit(&self, record: EventRecord) {
        let sink = Arc::clone(&self.sink);
        self.runtime.spawn(async move {
            let event_type = record.event_type;
            match sink.append(record).await {
                Ok(ack) if ack.accepted => {
                    metrics::record_submitted(event_type);
                    debug!(target: "herald::tracker", event_type = %event_type, "event recorded");
                }
                Ok(ack) => {
                    metrics::record_dropped(event_type);
                    warn!(
                        target: "herald::tracker",
                        event_type = %event_type,
                        reason = ack.dropped_reason.as_deref().unwrap_or("unspecified"),
                        "sink dropped event"
                    );
                }
                Err(err) => {
                    metrics::record_failed(event_type);
                    warn!(
                        target: "herald::tracker",
                        event_type = %event_type,
                        error = %err,
                        "failed to track event"
                    );
                }
            }
        });
    }

    fn track_shaped(&self, event_type: EventType, mut data: EventData, extra: Option<EventData>) {
        if let Some(extra) = extra {
            data.fill_from(extra);
        }
        self.track_event(event_type, data);
    }

    pub fn track_page_view(&self, page_name: &str, extra: Option<EventData>) {
        self.track_shaped(
            EventType::PageView,
            EventData::new().with("page", page_name),
            extra,
        );
    }

    pub fn track_post_engagement(&self, action: PostAction, post_id: &str, extra: Option<EventData>) {
        self.track_shaped(
            action.event_type(),
            EventData::new().with("post_id", post_id),
            extra,
        );
    }

    pub fn track_profile_view(&self, profile_user_id: &str) {
        self.track_event(
            EventType::ProfileView,
            EventData::new().with("profile_user_id", profile_user_id),
        );
    }

    pub fn track_follow(&self, target_user_id: &str, is_follow: bool) {
        let event_type = if is_follow {
            EventType::Follow
        } else {
            EventType::Unfollow
        };
        self.track_event(
            event_type,
            EventData::new().with("target_user_id", target_user_id),
        );
    }

    pub fn track_task_complete(&self, task_id: &str, reward: u64) {
        self.track_event(
            EventType::TaskComplete,
            EventData::new()
                .with("task_id", task_id)
                .with("reward", reward),
        );
    }

    pub fn track_ad_interaction(&self, action: AdAction, campaign_id: &str, extra: Option<EventData>) {
        self.track_shaped(
            action.event_type(),
            EventData::new().with("campaign_id", campaign_id),
            extra,
        );
    }

    pub fn track_search(&self, query: &str, results_count: usize) {
        self.track_event(
            EventType::Search,
            EventData::new()
                .with("query", query)
                .with("results_count", results_count),
        );
    }

    pub fn track_wallet_view(&self, extra: Option<EventData>) {
        self.track_shaped(EventType::WalletView, EventData::new(), extra);
    }

    pub fn track_reward_claim(&self, reward_id: &str, amount: u64) {
        self.track_event(
            EventType::RewardClaim,
            EventData::new()
                .with("reward_id", reward_id)
                .with("amount", amount),
        );
    }

    /// Emits `session_start` for the current (possibly new) session.
    pub fn start_session(&self) {
        self.track_event(EventType::SessionStart, EventData::new());
    }

    /// Emits `session_end` and tears the session down.
    pub fn end_session(&self) {
        self.track_event(EventType::SessionEnd, EventData::new());
        self.session.end();
    }
}

pub struct TrackerBuilder {
    sink: Arc<dyn EventSink>,
    actor: Option<Arc<dyn ActorResolver>>,
    navigation: Option<Arc<dyn NavigationContext>>,
    session: Option<Arc<SessionContext>>,
    clock: Option<Arc<MonotonicClock>>,
    runtime: Option<Handle>,
}

impl TrackerBuilder {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            actor: None,
            navigation: None,
            session: None,
            clock: None,
            runtime: None,
        }
    }

    pub fn actor(mut self, actor: Arc<dyn ActorResolver>) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn navigation(mut self, navigation: Arc<dyn NavigationContext>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn clock(mut self, clock: Arc<MonotonicClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<Tracker, TrackerError> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| TrackerError::NoRuntime)?,
        };
        Ok(Tracker {
            sink: self.sink,
            actor: self
                .actor
                .unwrap_or_else(|| Arc::new(AuthState::new()) as Arc<dyn ActorResolver>),
            navigation: self
                .navigation
                .unwrap_or_else(|| Arc::new(BrowserContext::default()) as Arc<dyn NavigationContext>),
            session: self.session.unwrap_or_default(),
            clock: self.clock.unwrap_or_default(),
            runtime,
        })
    }
}
