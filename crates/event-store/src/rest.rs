//! Sink that inserts records into a hosted REST table.

use async_trait::async_trait;
use reqwest::Client;

use crate::api::{EventSink, EventSinkResult};
use crate::config::RestSinkCfg;
use crate::errors::EsErrorKind;
use crate::model::{AppendAck, EventRecord};

pub struct RestEventSink {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestEventSink {
    pub fn new(cfg: RestSinkCfg) -> EventSinkResult<Self> {
        if cfg.url.trim().is_empty() {
            return Err(EsErrorKind::InvalidConfig("sink url is empty".into()).into());
        }
        if cfg.api_key.trim().is_empty() {
            return Err(EsErrorKind::InvalidConfig("sink api key is empty".into()).into());
        }
        let client = Client::builder()
            .build()
            .map_err(|err| EsErrorKind::Internal(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint(),
            api_key: cfg.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventSink for RestEventSink {
    async fn append(&self, record: EventRecord) -> EventSinkResult<AppendAck> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await
            .map_err(|err| EsErrorKind::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(AppendAck::accepted());
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<response unavailable>".to_string());
        if status.is_client_error() {
            return Err(EsErrorKind::AppendRejected(format!("{status}: {text}")).into());
        }
        Err(EsErrorKind::Transport(format!("{status}: {text}")).into())
    }
}
