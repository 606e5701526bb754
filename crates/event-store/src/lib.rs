pub mod api;
pub mod config;
pub mod errors;
pub mod model;
pub mod rest;

mod ring;

pub use api::{EventSink, EventSinkResult, InMemoryEventStore, PostHook};
pub use config::{MemoryCfg, RestSinkCfg};
pub use errors::{EsError, EsErrorKind};
pub use model::{AppendAck, EventData, EventRecord, EventValue};
pub use rest::RestEventSink;
