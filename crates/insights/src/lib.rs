//! Content-strategy insights from a chat-completion model.
//!
//! [`InsightGenerator`] turns a batch of posts and engagement aggregates into
//! an [`InsightReport`]. Upstream failures are errors; an upstream reply that
//! cannot be decoded degrades to [`InsightReport::fallback`].

pub mod decode;
pub mod errors;
pub mod generator;
pub mod metrics;
pub mod model;
pub mod openai;
pub mod prompt;

pub use decode::{decode_report, extract_json_object, DecodeStage, Decoded};
pub use errors::InsightError;
pub use generator::{InsightGenerator, InsightSettings, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use model::{ContentInsight, EngagementTip, InsightReport, InsightRequest, PostingTime, Priority};
pub use openai::{
    ChatCompletionPort, ChatCompletionRequest, ChatMessage, OpenAiChatClient, OpenAiConfig,
    DEFAULT_API_BASE, DEFAULT_TIMEOUT,
};
