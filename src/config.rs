use std::{net::SocketAddr, time::Duration};

use thiserror::Error;
use tracing::Level;
use url::Url;

use crate::runner::DEFAULT_QUESTION_DELAY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TELOXIDE_TOKEN (or TELEGRAM_BOT_TOKEN) should be set")]
    MissingToken,
    #[error("LOG_LEVEL '{0}' is not a valid level")]
    InvalidLogLevel(String),
    #[error("QUESTION_DELAY_SECS '{0}' is not a number of seconds")]
    InvalidDelay(String),
    #[error("NGROK_URL can't be parsed: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),
    #[error("NGROK_ADDR can't be parsed: {0}")]
    InvalidWebhookAddr(#[from] std::net::AddrParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub log_level: Level,
    pub question_delay: Duration,
    /// Set when both `NGROK_URL` and `NGROK_ADDR` are present; the bot
    /// long-polls otherwise.
    pub webhook: Option<WebhookConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = non_empty("TELOXIDE_TOKEN")
            .or_else(|| non_empty("TELEGRAM_BOT_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let log_level = match non_empty("LOG_LEVEL") {
            Some(level) => level
                .parse()
                .map_err(|_| ConfigError::InvalidLogLevel(level))?,
            None => Level::INFO,
        };

        let question_delay = match non_empty("QUESTION_DELAY_SECS") {
            Some(secs) => secs
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidDelay(secs))?,
            None => DEFAULT_QUESTION_DELAY,
        };

        let webhook = match (non_empty("NGROK_URL"), non_empty("NGROK_ADDR")) {
            (Some(url), Some(addr)) => Some(WebhookConfig {
                url: url.parse()?,
                addr: addr.parse()?,
            }),
            _ => None,
        };

        Ok(Self {
            token,
            log_level,
            question_delay,
            webhook,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn token_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingToken)));
        assert!(matches!(
            load(&[("TELOXIDE_TOKEN", "  ")]),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("TELOXIDE_TOKEN", "abc")]).unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.question_delay, Duration::from_secs(2));
        assert!(config.webhook.is_none());
    }

    #[test]
    fn falls_back_to_telegram_bot_token() {
        let config = load(&[("TELEGRAM_BOT_TOKEN", "xyz")]).unwrap();

        assert_eq!(config.token, "xyz");
    }

    #[test]
    fn parses_optional_settings() {
        let config = load(&[
            ("TELOXIDE_TOKEN", "abc"),
            ("LOG_LEVEL", "debug"),
            ("QUESTION_DELAY_SECS", "5"),
            ("NGROK_URL", "https://example.ngrok.app/"),
            ("NGROK_ADDR", "127.0.0.1:8443"),
        ])
        .unwrap();

        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.question_delay, Duration::from_secs(5));
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url.as_str(), "https://example.ngrok.app/");
        assert_eq!(webhook.addr, "127.0.0.1:8443".parse().unwrap());
    }

    #[test]
    fn webhook_needs_both_settings() {
        let config = load(&[
            ("TELOXIDE_TOKEN", "abc"),
            ("NGROK_URL", "https://example.ngrok.app/"),
        ])
        .unwrap();

        assert!(config.webhook.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            load(&[("TELOXIDE_TOKEN", "abc"), ("LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
        assert!(matches!(
            load(&[("TELOXIDE_TOKEN", "abc"), ("QUESTION_DELAY_SECS", "-1")]),
            Err(ConfigError::InvalidDelay(_))
        ));
        assert!(matches!(
            load(&[
                ("TELOXIDE_TOKEN", "abc"),
                ("NGROK_URL", "https://example.ngrok.app/"),
                ("NGROK_ADDR", "nowhere"),
            ]),
            Err(ConfigError::InvalidWebhookAddr(_))
        ));
    }
}
