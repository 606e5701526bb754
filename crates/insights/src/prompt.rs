use serde_json::Value;

use crate::model::InsightRequest;

const SYSTEM_PROMPT: &str = "You are a social media strategist for Herald, a community \
platform that rewards creators with tokens. Analyze the posts and engagement data you are \
given and respond with a single JSON object and nothing else.";

const RESPONSE_SHAPE: &str = r#"{
  "optimalPostingTimes": [{"day": "string", "time": "string", "reason": "string"}],
  "contentInsights": [{"title": "string", "description": "string", "priority": "high|medium|low"}],
  "engagementTips": [{"tip": "string", "expectedImpact": "string"}],
  "topPerformingContentType": "string",
  "audienceActivityPattern": "string"
}"#;

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Build the user message embedding the request payload.
pub fn build_user_prompt(request: &InsightRequest) -> String {
    let posts = Value::Array(request.posts.clone());
    format!(
        "Analyze the following posts and engagement metrics.\n\n\
         Posts:\n{}\n\n\
         Engagement data:\n{}\n\n\
         Provide three optimal posting times, three content insights, and three engagement \
         tips. Respond with JSON in exactly this shape:\n{}",
        pretty(&posts),
        pretty(&request.engagement_data),
        RESPONSE_SHAPE
    )
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_prompt_embeds_pretty_payload() {
        let request = InsightRequest::new(
            vec![json!({"id": "p1", "likes": 4})],
            json!({"totalLikes": 4}),
        );
        let prompt = build_user_prompt(&request);
        assert!(prompt.contains("\"id\": \"p1\""));
        assert!(prompt.contains("\"totalLikes\": 4"));
        assert!(prompt.contains("\"audienceActivityPattern\""));
    }

    #[test]
    fn empty_request_still_builds() {
        let prompt = build_user_prompt(&InsightRequest::default());
        assert!(prompt.contains("Posts:\n[]"));
    }
}
