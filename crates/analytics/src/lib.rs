//! Engagement event tracking.
//!
//! [`Tracker`] enriches UI actions with ambient context (path, referrer, user
//! agent, timestamp, session id) and hands them to an [`EventSink`] without
//! making the caller wait. Submission failures are logged and counted, never
//! returned.

pub mod context;
pub mod metrics;
pub mod session;
pub mod tracker;

pub use context::{
    ActorResolver, AuthState, BrowserContext, Clock, DEFAULT_USER_AGENT, FixedClock, MonotonicClock,
    NavigationContext, PageContext, SystemClock,
};
pub use herald_core_types::{AdAction, ActorId, EventFamily, EventType, PostAction, SessionId};
pub use herald_event_store::{EventData, EventRecord, EventSink, EventValue};
pub use session::{RandomSessionIds, SequentialSessionIds, SessionContext, SessionIdGenerator};
pub use tracker::{Tracker, TrackerBuilder, TrackerError};
