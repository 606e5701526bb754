use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::InsightError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Transport to a chat-completion service. Returns the text of the first choice.
#[async_trait]
pub trait ChatCompletionPort: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<String, InsightError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct OpenAiChatClient {
    client: Client,
    url: String,
}

impl OpenAiChatClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| InsightError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatCompletionPort for OpenAiChatClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<String, InsightError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| InsightError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(InsightError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| InsightError::InvalidResponse(err.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .and_then(ChatCompletionContent::as_text)
            .ok_or_else(|| InsightError::InvalidResponse("response missing content".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<ChatCompletionContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatCompletionContent {
    Text(String),
    Parts(Vec<ChatCompletionPart>),
}

impl ChatCompletionContent {
    fn as_text(&self) -> Option<String> {
        match self {
            ChatCompletionContent::Text(value) => Some(value.clone()),
            ChatCompletionContent::Parts(parts) => {
                let text = parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n");
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionPart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn spawn_stub(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn client(api_base: String) -> OpenAiChatClient {
        OpenAiChatClient::new(OpenAiConfig {
            api_base,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gpt-4o-mini".into(),
            temperature: 0.3,
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
        }
    }

    async fn echo_handler(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": format!(
                        "{auth}|{}|{}|{}",
                        body["model"].as_str().unwrap_or_default(),
                        body["messages"][0]["role"].as_str().unwrap_or_default(),
                        body["temperature"]
                    )
                }
            }]
        }))
    }

    #[tokio::test]
    async fn sends_bearer_and_payload() {
        let base = spawn_stub(Router::new().route("/v1/chat/completions", post(echo_handler))).await;
        let text = client(base).complete("sk-test", &request()).await.unwrap();
        assert_eq!(text, "Bearer sk-test|gpt-4o-mini|system|0.3");
    }

    #[tokio::test]
    async fn joins_content_parts() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(json!({
                    "choices": [{"message": {"content": [{"type": "text", "text": "part one"}, {"type": "text", "text": "part two"}]}}]
                }))
            }),
        );
        let text = client(spawn_stub(app).await)
            .complete("sk-test", &request())
            .await
            .unwrap();
        assert_eq!(text, "part one\npart two");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited").into_response() }),
        );
        let err = client(spawn_stub(app).await)
            .complete("sk-test", &request())
            .await
            .unwrap_err();
        match err {
            InsightError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_chat_envelope_is_invalid_response() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let err = client(spawn_stub(app).await)
            .complete("sk-test", &request())
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::InvalidResponse(_)));
    }

    #[test]
    fn url_joins_trailing_slash() {
        let client = client("https://llm.example/v1/".into());
        assert_eq!(client.url(), "https://llm.example/v1/chat/completions");
    }
}
