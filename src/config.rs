//! Configuration and settings management
//!
//! Loads settings from environment variables and defines the relay constants.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::fmt;

/// Default `OpenRouter` chat completions endpoint
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Default model used for every relayed message
pub const OPENROUTER_MODEL: &str = "deepseek/deepseek-chat";

/// Application settings loaded from environment variables
#[derive(Deserialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token (`BOT_TOKEN`)
    pub bot_token: String,

    /// `OpenRouter` API key (`OPENROUTER_API_KEY`)
    pub openrouter_api_key: String,

    /// Chat completions endpoint (`OPENROUTER_API_URL`)
    #[serde(default = "default_openrouter_api_url")]
    pub openrouter_api_url: String,

    /// Model identifier sent with each request (`OPENROUTER_MODEL`)
    #[serde(default = "default_openrouter_model")]
    pub openrouter_model: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"[MASKED]")
            .field("openrouter_api_key", &"[MASKED]")
            .field("openrouter_api_url", &self.openrouter_api_url)
            .field("openrouter_model", &self.openrouter_model)
            .finish()
    }
}

fn default_openrouter_api_url() -> String {
    OPENROUTER_API_URL.to_string()
}

fn default_openrouter_model() -> String {
    OPENROUTER_MODEL.to_string()
}

impl Settings {
    /// Create new settings by loading from the process environment
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use openrouter_relay_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a required variable is missing or blank.
    pub fn new() -> Result<Self, ConfigError> {
        let source = Config::builder()
            // Environment::default() maps UPPER_SNAKE_CASE to snake_case keys,
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        Self::from_config(source)
    }

    /// Deserialize and validate settings from an already built [`Config`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if deserialization or validation fails.
    pub fn from_config(source: Config) -> Result<Self, ConfigError> {
        let settings: Self = source.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject credentials that are present but blank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Message("BOT_TOKEN must not be empty".into()));
        }
        if self.openrouter_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "OPENROUTER_API_KEY must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Get the outbound LLM request timeout from env.
///
/// Environment variable: `LLM_HTTP_TIMEOUT_SECS`. Unset, unparsable or zero
/// means requests run without a timeout.
#[must_use]
pub fn get_llm_http_timeout_secs() -> Option<u64> {
    parse_timeout_secs(std::env::var("LLM_HTTP_TIMEOUT_SECS").ok().as_deref())
}

fn parse_timeout_secs(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn source(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        pairs
            .iter()
            .try_fold(Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value)
            })?
            .build()
    }

    #[test]
    fn test_defaults_applied() -> Result<(), Box<dyn std::error::Error>> {
        let settings = Settings::from_config(source(&[
            ("bot_token", "123:abc"),
            ("openrouter_api_key", "sk-or-test"),
        ])?)?;

        assert_eq!(settings.bot_token, "123:abc");
        assert_eq!(settings.openrouter_api_key, "sk-or-test");
        assert_eq!(settings.openrouter_api_url, OPENROUTER_API_URL);
        assert_eq!(settings.openrouter_model, OPENROUTER_MODEL);
        Ok(())
    }

    #[test]
    fn test_overrides_respected() -> Result<(), Box<dyn std::error::Error>> {
        let settings = Settings::from_config(source(&[
            ("bot_token", "123:abc"),
            ("openrouter_api_key", "sk-or-test"),
            ("openrouter_api_url", "http://localhost:9000/v1/chat/completions"),
            ("openrouter_model", "openai/gpt-4o-mini"),
        ])?)?;

        assert_eq!(
            settings.openrouter_api_url,
            "http://localhost:9000/v1/chat/completions"
        );
        assert_eq!(settings.openrouter_model, "openai/gpt-4o-mini");
        Ok(())
    }

    #[test]
    fn test_debug_masks_credentials() -> Result<(), Box<dyn std::error::Error>> {
        let settings = Settings::from_config(source(&[
            ("bot_token", "123:secret_bot_token"),
            ("openrouter_api_key", "sk-or-secret"),
        ])?)?;

        let printed = format!("{settings:?}");
        assert!(!printed.contains("secret_bot_token"));
        assert!(!printed.contains("sk-or-secret"));
        assert!(printed.contains(OPENROUTER_MODEL));
        Ok(())
    }

    #[test]
    fn test_missing_key_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let result = Settings::from_config(source(&[("bot_token", "123:abc")])?);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_blank_key_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let result = Settings::from_config(source(&[
            ("bot_token", "   "),
            ("openrouter_api_key", "sk-or-test"),
        ])?);
        assert!(matches!(result, Err(ConfigError::Message(_))));
        Ok(())
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout_secs(None), None);
        assert_eq!(parse_timeout_secs(Some("")), None);
        assert_eq!(parse_timeout_secs(Some("abc")), None);
        assert_eq!(parse_timeout_secs(Some("0")), None);
        assert_eq!(parse_timeout_secs(Some(" 45 ")), Some(45));
    }

    // Only test in this module that touches the process environment
    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        env::set_var("BOT_TOKEN", "42:env_token");
        env::set_var("OPENROUTER_API_KEY", "sk-or-env");
        env::set_var("OPENROUTER_MODEL", "");

        let settings = Settings::new()?;
        assert_eq!(settings.bot_token, "42:env_token");
        assert_eq!(settings.openrouter_api_key, "sk-or-env");
        // Empty env var is treated as unset
        assert_eq!(settings.openrouter_model, OPENROUTER_MODEL);

        env::remove_var("BOT_TOKEN");
        env::remove_var("OPENROUTER_API_KEY");
        env::remove_var("OPENROUTER_MODEL");
        Ok(())
    }
}
