//! Process configuration.
//!
//! Values come from YAML first and are then overridden by `HERALD_*`
//! environment variables. Secrets are normally supplied through the
//! environment only.

use std::env;
use std::time::Duration;

use herald_event_store::RestSinkCfg;
use herald_insights::{InsightSettings, OpenAiConfig, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ENV_LLM_API_KEY: &str = "HERALD_LLM_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_LLM_MODEL: &str = "HERALD_LLM_MODEL";
pub const ENV_LLM_API_BASE: &str = "HERALD_LLM_API_BASE";
pub const ENV_SINK_URL: &str = "HERALD_SINK_URL";
pub const ENV_SINK_API_KEY: &str = "HERALD_SINK_API_KEY";
pub const ENV_SINK_TABLE: &str = "HERALD_SINK_TABLE";
pub const ENV_SERVE_PORT: &str = "HERALD_SERVE_PORT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub serve: ServeConfig,
    pub insights: InsightsConfig,
    pub sink: SinkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Prefer `HERALD_LLM_API_KEY` over storing the key in YAML.
    pub api_key: Option<String>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

impl InsightsConfig {
    pub fn settings(&self) -> InsightSettings {
        InsightSettings {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }

    pub fn openai(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_base: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: herald_event_store::config::DEFAULT_TABLE.to_string(),
        }
    }
}

impl SinkConfig {
    /// REST sink settings, when both url and key are present.
    pub fn rest(&self) -> Option<RestSinkCfg> {
        let url = non_blank(self.url.as_deref())?;
        let api_key = non_blank(self.api_key.as_deref())?;
        let mut cfg = RestSinkCfg::new(url, api_key);
        cfg.table = self.table.clone();
        Some(cfg)
    }
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get(ENV_LLM_API_KEY).or_else(|| get(ENV_OPENAI_API_KEY)) {
            self.insights.api_key = Some(key);
        }
        if let Some(model) = get(ENV_LLM_MODEL) {
            self.insights.model = model;
        }
        if let Some(base) = get(ENV_LLM_API_BASE) {
            self.insights.api_base = base;
        }
        if let Some(url) = get(ENV_SINK_URL) {
            self.sink.url = Some(url);
        }
        if let Some(key) = get(ENV_SINK_API_KEY) {
            self.sink.api_key = Some(key);
        }
        if let Some(table) = get(ENV_SINK_TABLE) {
            self.sink.table = table;
        }
        if let Some(port) = get(ENV_SERVE_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.serve.port = port,
                Err(err) => warn!(value = %port, ?err, "ignoring invalid {}", ENV_SERVE_PORT),
            }
        }
    }

    pub fn insights_configured(&self) -> bool {
        non_blank(self.insights.api_key.as_deref()).is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn yaml_sections_are_optional() {
        let config: Config = serde_yaml::from_str("insights:\n  model: gpt-4o\n").unwrap();
        assert_eq!(config.insights.model, "gpt-4o");
        assert_eq!(config.insights.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.serve, ServeConfig::default());
        assert_eq!(config.sink.table, "analytics_events");
    }

    #[test]
    fn herald_key_wins_over_openai_key() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            (ENV_OPENAI_API_KEY, "sk-openai"),
            (ENV_LLM_API_KEY, "sk-herald"),
        ]));
        assert_eq!(config.insights.api_key.as_deref(), Some("sk-herald"));

        let mut config = Config::default();
        config.apply_overrides(lookup(&[(ENV_OPENAI_API_KEY, "sk-openai"), (ENV_LLM_API_KEY, " ")]));
        assert_eq!(config.insights.api_key.as_deref(), Some("sk-openai"));
        assert!(config.insights_configured());
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[(ENV_SERVE_PORT, "not-a-port")]));
        assert_eq!(config.serve.port, 8787);
        config.apply_overrides(lookup(&[(ENV_SERVE_PORT, "9100")]));
        assert_eq!(config.serve.port, 9100);
    }

    #[test]
    fn rest_sink_requires_url_and_key() {
        let mut config = Config::default();
        assert!(config.sink.rest().is_none());
        config.apply_overrides(lookup(&[
            (ENV_SINK_URL, "https://db.example"),
            (ENV_SINK_API_KEY, "anon"),
            (ENV_SINK_TABLE, "events"),
        ]));
        let rest = config.sink.rest().unwrap();
        assert_eq!(rest.endpoint(), "https://db.example/rest/v1/events");
    }

    #[test]
    fn insights_settings_carry_config() {
        let mut config = Config::default();
        config.insights.timeout_secs = 0;
        config.insights.api_key = Some("sk".into());
        assert_eq!(config.insights.openai().timeout, Duration::from_secs(1));
        assert_eq!(config.insights.settings().api_key.as_deref(), Some("sk"));
    }
}
