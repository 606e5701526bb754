use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Batch submitted for analysis. Both fields default to empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    #[serde(default)]
    pub posts: Vec<Value>,
    #[serde(default = "empty_object")]
    pub engagement_data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Default for InsightRequest {
    fn default() -> Self {
        Self::new(Vec::new(), empty_object())
    }
}

impl InsightRequest {
    pub fn new(posts: Vec<Value>, engagement_data: Value) -> Self {
        Self {
            posts,
            engagement_data,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Low", alias = "LOW")]
    Low,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingTime {
    pub day: String,
    pub time: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInsight {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementTip {
    pub tip: String,
    pub expected_impact: String,
}

/// Content-strategy analysis returned to the dashboard.
///
/// Every field is required when decoding a model reply; a reply missing any
/// of them is treated as unparseable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub optimal_posting_times: Vec<PostingTime>,
    pub content_insights: Vec<ContentInsight>,
    pub engagement_tips: Vec<EngagementTip>,
    pub top_performing_content_type: String,
    pub audience_activity_pattern: String,
}

impl InsightReport {
    /// Report served when the model reply cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            optimal_posting_times: vec![
                posting_time(
                    "Tuesday",
                    "10:00 AM",
                    "Mid-morning weekday activity peaks as users check feeds during breaks",
                ),
                posting_time(
                    "Thursday",
                    "2:00 PM",
                    "Afternoon engagement rises ahead of the weekend",
                ),
                posting_time(
                    "Saturday",
                    "11:00 AM",
                    "Weekend mornings give users time to browse and interact",
                ),
            ],
            content_insights: vec![
                ContentInsight {
                    title: "Visual content performs best".to_string(),
                    description: "Posts with images or video receive noticeably more likes and shares than text-only posts".to_string(),
                    priority: Priority::High,
                },
                ContentInsight {
                    title: "Ask questions to drive comments".to_string(),
                    description: "Posts that end with a question invite replies and lift comment counts".to_string(),
                    priority: Priority::Medium,
                },
                ContentInsight {
                    title: "Post consistently".to_string(),
                    description: "A steady posting cadence keeps followers engaged and grows reach over time".to_string(),
                    priority: Priority::Low,
                },
            ],
            engagement_tips: vec![
                EngagementTip {
                    tip: "Reply to comments within the first hour".to_string(),
                    expected_impact: "Higher visibility and repeat engagement".to_string(),
                },
                EngagementTip {
                    tip: "Use trending topics relevant to your audience".to_string(),
                    expected_impact: "Broader discovery through search and shares".to_string(),
                },
                EngagementTip {
                    tip: "Highlight token rewards in calls to action".to_string(),
                    expected_impact: "More task completions and reward claims".to_string(),
                },
            ],
            top_performing_content_type: "Image posts".to_string(),
            audience_activity_pattern: "Most active on weekday mornings and weekend afternoons"
                .to_string(),
        }
    }
}

fn posting_time(day: &str, time: &str, reason: &str) -> PostingTime {
    PostingTime {
        day: day.to_string(),
        time: time.to_string(),
        reason: reason.to_string(),
    }
}
