use std::collections::BTreeMap;

use herald_core_types::{ActorId, EventType, SessionId};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Scalar carried in an event payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl EventValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            EventValue::Number(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EventValue::Number(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EventValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, EventValue::Null)
    }
}

impl From<&str> for EventValue {
    fn from(value: &str) -> Self {
        EventValue::Text(value.to_string())
    }
}

impl From<String> for EventValue {
    fn from(value: String) -> Self {
        EventValue::Text(value)
    }
}

impl From<&String> for EventValue {
    fn from(value: &String) -> Self {
        EventValue::Text(value.clone())
    }
}

impl From<bool> for EventValue {
    fn from(value: bool) -> Self {
        EventValue::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for EventValue {
                fn from(value: $ty) -> Self {
                    EventValue::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for EventValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(EventValue::Number)
            .unwrap_or(EventValue::Null)
    }
}

impl<T> From<Option<T>> for EventValue
where
    T: Into<EventValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(EventValue::Null)
    }
}

/// Caller-supplied payload merged with ambient context before submission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData(BTreeMap<String, EventValue>);

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<EventValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EventValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Copies entries from `other` whose keys are not already present.
    pub fn fill_from(&mut self, other: EventData) {
        for (key, value) in other.0 {
            self.0.entry(key).or_insert(value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&EventValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EventData
where
    K: Into<String>,
    V: Into<EventValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = EventData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

/// One observed user action, as written to the sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub user_id: ActorId,
    pub event_type: EventType,
    pub event_data: EventData,
    pub session_id: SessionId,
}

/// Acknowledgement returned by sinks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppendAck {
    pub accepted: bool,
    pub dropped_reason: Option<String>,
}

impl AppendAck {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            dropped_reason: None,
        }
    }

    pub fn dropped(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            dropped_reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_serializes_in_sink_shape() {
        let record = EventRecord {
            user_id: ActorId("user-42".into()),
            event_type: EventType::Follow,
            event_data: EventData::new()
                .with("target_user_id", "user-7")
                .with("results_count", 12)
                .with("promoted", false)
                .with("referrer", None::<String>),
            session_id: SessionId("session_1_abc".into()),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "user_id": "user-42",
                "event_type": "follow",
                "event_data": {
                    "promoted": false,
                    "referrer": null,
                    "results_count": 12,
                    "target_user_id": "user-7"
                },
                "session_id": "session_1_abc"
            })
        );
    }

    #[test]
    fn fill_from_keeps_existing_keys() {
        let mut data = EventData::new().with("post_id", "p-1");
        data.fill_from(EventData::new().with("post_id", "spoofed").with("source", "feed"));
        assert_eq!(data.get("post_id").and_then(EventValue::as_str), Some("p-1"));
        assert_eq!(data.get("source").and_then(EventValue::as_str), Some("feed"));
    }

    #[test]
    fn non_finite_float_becomes_null() {
        assert!(EventValue::from(f64::NAN).is_null());
        assert_eq!(EventValue::from(2.5).as_f64(), Some(2.5));
    }

    #[test]
    fn payload_deserializes_scalars() {
        let data: EventData =
            serde_json::from_str(r#"{"a":"x","b":3,"c":true,"d":null}"#).unwrap();
        assert_eq!(data.get("a"), Some(&EventValue::Text("x".into())));
        assert_eq!(data.get("b").and_then(EventValue::as_i64), Some(3));
        assert_eq!(data.get("c").and_then(EventValue::as_bool), Some(true));
        assert!(data.get("d").unwrap().is_null());
    }
}
