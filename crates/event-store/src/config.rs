use serde::{Deserialize, Serialize};

/// Capacity knobs for the in-memory sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryCfg {
    /// Maximum records kept before the oldest is evicted; `0` keeps everything.
    pub capacity: usize,
}

impl Default for MemoryCfg {
    fn default() -> Self {
        Self { capacity: 10_000 }
    }
}

/// Connection settings for the hosted REST event table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestSinkCfg {
    /// Project base URL, e.g. `https://project.example.co`.
    pub url: String,
    /// Anonymous/public key sent as both `apikey` and bearer token.
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

pub const DEFAULT_TABLE: &str = "analytics_events";

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl RestSinkCfg {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: default_table(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }
}
