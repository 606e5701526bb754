use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::decode::{decode_report, DecodeStage};
use crate::errors::InsightError;
use crate::metrics;
use crate::model::{InsightReport, InsightRequest};
use crate::openai::{ChatCompletionPort, ChatCompletionRequest, ChatMessage, OpenAiChatClient, OpenAiConfig};
use crate::prompt;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct InsightSettings {
    /// Upstream credential. `None` or blank makes every request fail.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

pub struct InsightGenerator {
    port: Arc<dyn ChatCompletionPort>,
    settings: InsightSettings,
}

impl InsightGenerator {
    pub fn new(port: Arc<dyn ChatCompletionPort>, settings: InsightSettings) -> Self {
        Self { port, settings }
    }

    pub fn openai(settings: InsightSettings, config: OpenAiConfig) -> Result<Self, InsightError> {
        let client = OpenAiChatClient::new(config)?;
        Ok(Self::new(Arc::new(client), settings))
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn settings(&self) -> &InsightSettings {
        &self.settings
    }

    fn api_key(&self) -> Option<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    #[instrument(skip_all, fields(posts = request.posts.len(), model = %self.settings.model))]
    pub async fn generate(&self, request: &InsightRequest) -> Result<InsightReport, InsightError> {
        let result = self.run(request).await;
        if let Err(err) = &result {
            metrics::record_request(err.label());
        }
        result
    }

    async fn run(&self, request: &InsightRequest) -> Result<InsightReport, InsightError> {
        let api_key = self.api_key().ok_or(InsightError::MissingCredential)?;

        let chat = ChatCompletionRequest {
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            messages: vec![
                ChatMessage::system(prompt::system_prompt()),
                ChatMessage::user(prompt::build_user_prompt(request)),
            ],
        };

        let started = Instant::now();
        let reply = self.port.complete(api_key, &chat).await;
        let elapsed = started.elapsed().as_secs_f64();
        let reply = match reply {
            Ok(text) => {
                metrics::observe_upstream("ok", elapsed);
                text
            }
            Err(err) => {
                metrics::observe_upstream(err.label(), elapsed);
                if let InsightError::Upstream { status, body } = &err {
                    warn!(
                        target: "herald::insights",
                        status = *status,
                        body = %body,
                        "upstream model returned an error"
                    );
                } else {
                    warn!(target: "herald::insights", error = %err, "upstream model call failed");
                }
                return Err(err);
            }
        };

        let decoded = decode_report(&reply);
        metrics::record_request(decoded.stage.as_str());
        match decoded.stage {
            DecodeStage::Fallback => warn!(
                target: "herald::insights",
                error = decoded.error.as_deref().unwrap_or_default(),
                reply_len = reply.len(),
                "model reply could not be decoded; serving default report"
            ),
            stage => debug!(target: "herald::insights", stage = stage.as_str(), "decoded model reply"),
        }
        Ok(decoded.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays a canned reply and records every request it sees.
    struct ScriptedPort {
        reply: Result<String, (u16, String)>,
        seen: Mutex<Vec<(String, ChatCompletionRequest)>>,
    }

    impl ScriptedPort {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err((status, body.to_string())),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatCompletionPort for ScriptedPort {
        async fn complete(
            &self,
            api_key: &str,
            request: &ChatCompletionRequest,
        ) -> Result<String, InsightError> {
            self.seen
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, body)) => Err(InsightError::Upstream {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    fn settings(api_key: Option<&str>) -> InsightSettings {
        InsightSettings {
            api_key: api_key.map(str::to_string),
            ..InsightSettings::default()
        }
    }

    fn sample_request() -> InsightRequest {
        InsightRequest::new(
            vec![json!({"id": "p1", "content": "gm", "likes": 10})],
            json!({"totalViews": 120, "totalLikes": 10}),
        )
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_call() {
        for key in [None, Some(""), Some("   ")] {
            let port = ScriptedPort::replying("{}");
            let generator = InsightGenerator::new(port.clone(), settings(key));
            assert!(!generator.is_configured());
            let err = generator.generate(&sample_request()).await.unwrap_err();
            assert!(matches!(err, InsightError::MissingCredential));
            assert_eq!(port.calls(), 0);
        }
    }

    #[tokio::test]
    async fn prose_reply_yields_default_report() {
        let port = ScriptedPort::replying("I think you should post more often. Good luck!");
        let generator = InsightGenerator::new(port.clone(), settings(Some("sk-test")));
        let before = metrics::request_count("fallback");

        let report = generator.generate(&sample_request()).await.unwrap();
        assert_eq!(report, InsightReport::fallback());
        assert_eq!(port.calls(), 1);
        assert!(metrics::request_count("fallback") > before);
    }

    #[tokio::test]
    async fn parsed_reply_is_returned() {
        let mut expected = InsightReport::fallback();
        expected.audience_activity_pattern = "Night owls".into();
        let reply = format!(
            "Here you go:\n```json\n{}\n```",
            serde_json::to_string_pretty(&expected).unwrap()
        );
        let port = ScriptedPort::replying(&reply);
        let generator = InsightGenerator::new(port, settings(Some("sk-test")));

        let report = generator.generate(&sample_request()).await.unwrap();
        assert_eq!(report, expected);
    }

    #[tokio::test]
    async fn request_carries_prompt_model_and_temperature() {
        let port = ScriptedPort::replying("no json");
        let generator = InsightGenerator::new(port.clone(), settings(Some(" sk-test ")));
        generator.generate(&sample_request()).await.unwrap();

        let seen = port.seen.lock().unwrap();
        let (key, request) = &seen[0];
        assert_eq!(key, "sk-test");
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("\"totalViews\": 120"));
    }

    #[tokio::test]
    async fn upstream_status_is_surfaced() {
        let port = ScriptedPort::failing(503, "overloaded");
        let generator = InsightGenerator::new(port, settings(Some("sk-test")));
        let err = generator.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, InsightError::Upstream { status: 503, .. }));
    }
}
