use crate::{ConfigError, CoreError};
use serde::Deserialize;
use std::path::Path;

/// Contents of `config.json`.
///
/// Phrase order is significant: it is the search order and decides which
/// phrase a result is attributed to when several match.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(alias = "community_name")]
    pub subreddit_name: String,
    pub search_phrases: Vec<String>,
}

impl SearchConfig {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CoreError::Io(e)
            }
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let config: SearchConfig = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.subreddit_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "subreddit_name".to_string(),
            });
        }
        if self.search_phrases.is_empty() {
            return Err(ConfigError::MissingField {
                field: "search_phrases".to_string(),
            });
        }
        if let Some(blank) = self.search_phrases.iter().find(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "search_phrases".to_string(),
                value: format!("{:?}", blank),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender_email: String,
    pub sender_password: String,
    pub recipient_email: String,
}

/// Everything a run needs, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    pub search: SearchConfig,
    pub reddit: RedditCredentials,
    pub smtp: SmtpSettings,
}

impl Settings {
    pub fn load(config_path: &Path) -> Result<Self, CoreError> {
        let search = SearchConfig::load(config_path)?;
        Self::from_lookup(search, |name| std::env::var(name).ok())
    }

    /// Builds settings with environment values supplied by `lookup`.
    pub fn from_lookup<F>(search: SearchConfig, lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
                    var_name: name.to_string(),
                })
        };

        let reddit = RedditCredentials {
            client_id: require("REDDIT_CLIENT_ID")?,
            client_secret: require("REDDIT_CLIENT_SECRET")?,
            user_agent: require("REDDIT_USER_AGENT")?,
            username: require("REDDIT_USERNAME")?,
        };

        let port_raw = require("SMTP_PORT")?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "SMTP_PORT".to_string(),
                value: port_raw.clone(),
            })?;

        let smtp = SmtpSettings {
            server: require("SMTP_SERVER")?,
            port,
            sender_email: require("SENDER_EMAIL")?,
            sender_password: require("SENDER_PASSWORD")?,
            recipient_email: require("RECIPIENT_EMAIL")?,
        };

        Ok(Self {
            search,
            reddit,
            smtp,
        })
    }
}
