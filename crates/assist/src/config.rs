/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRANSCRIBE_MODEL: &str = "gpt-4o-mini-transcribe";
pub const DEFAULT_SUGGEST_MODEL: &str = "gpt-4o-2024-08-06";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Upper bound on the length of a suggestion.
pub const SUGGEST_MAX_TOKENS: u32 = 150;
pub const SUGGEST_TEMPERATURE: f32 = 0.7;

/// Provider settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// API key. `None` disables both operations.
    pub api_key: Option<String>,
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub transcribe_model: String,
    pub suggest_model: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            transcribe_model: DEFAULT_TRANSCRIBE_MODEL.to_string(),
            suggest_model: DEFAULT_SUGGEST_MODEL.to_string(),
        }
    }
}

impl AssistConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                       |
    /// |---------------------------|-------------------------------|
    /// | `OPENAI_API_KEY`          | unset (assistance disabled)   |
    /// | `OPENAI_BASE_URL`         | `https://api.openai.com/v1`   |
    /// | `OPENAI_TIMEOUT_SECS`     | `20`                          |
    /// | `OPENAI_TRANSCRIBE_MODEL` | `gpt-4o-mini-transcribe`      |
    /// | `OPENAI_SUGGEST_MODEL`    | `gpt-4o-2024-08-06`           |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let timeout_secs: u64 = get("OPENAI_TIMEOUT_SECS")
            .map(|v| v.parse().expect("OPENAI_TIMEOUT_SECS must be a valid u64"))
            .unwrap_or(defaults.timeout_secs);

        Self {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_secs,
            transcribe_model: get("OPENAI_TRANSCRIBE_MODEL").unwrap_or(defaults.transcribe_model),
            suggest_model: get("OPENAI_SUGGEST_MODEL").unwrap_or(defaults.suggest_model),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> AssistConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AssistConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = from_map(&[]);
        assert!(!config.is_configured());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.transcribe_model, "gpt-4o-mini-transcribe");
        assert_eq!(config.suggest_model, "gpt-4o-2024-08-06");
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_map(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("OPENAI_TIMEOUT_SECS", "5"),
            ("OPENAI_SUGGEST_MODEL", "small"),
        ]);
        assert!(config.is_configured());
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.suggest_model, "small");
    }

    #[test]
    fn blank_key_means_unconfigured() {
        let config = from_map(&[("OPENAI_API_KEY", "   ")]);
        assert!(!config.is_configured());
    }
}
