use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::chat_stream::TrailingFramePolicy;
use crate::core::config::io::ConfigError;
use crate::utils::url::{join_url, navigation_url};

pub const DEFAULT_CHAT_PATH: &str = "functions/v1/gem-assist";
pub const DEFAULT_CONTACT_PATH: &str = "functions/v1/contact-form";

pub const ENV_BASE_URL: &str = "GEM_ASSIST_BASE_URL";
pub const ENV_AUTH_TOKEN: &str = "GEM_ASSIST_TOKEN";
pub const ENV_SITE_URL: &str = "GEM_ASSIST_SITE_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the hosted functions project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_path: Option<String>,
    /// Public site used to resolve navigation targets like `/contact`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Publishable key sent as a bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_frames: Option<TrailingFramePolicy>,
}

/// Keys accepted by `gem-assist set` / `unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    ChatPath,
    ContactPath,
    SiteUrl,
    AuthToken,
    RequestTimeout,
    TrailingFrames,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 7] = [
        ConfigKey::BaseUrl,
        ConfigKey::ChatPath,
        ConfigKey::ContactPath,
        ConfigKey::SiteUrl,
        ConfigKey::AuthToken,
        ConfigKey::RequestTimeout,
        ConfigKey::TrailingFrames,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::ChatPath => "chat-path",
            ConfigKey::ContactPath => "contact-path",
            ConfigKey::SiteUrl => "site-url",
            ConfigKey::AuthToken => "auth-token",
            ConfigKey::RequestTimeout => "request-timeout",
            ConfigKey::TrailingFrames => "trailing-frames",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let normalized = name.trim().replace('_', "-").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownKey(name.to_string()))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn chat_url(&self) -> Result<String, ConfigError> {
        let base = self.require_base_url()?;
        let path = non_empty(&self.chat_path).unwrap_or(DEFAULT_CHAT_PATH);
        Ok(join_url(base, path))
    }

    pub fn contact_url(&self) -> Result<String, ConfigError> {
        let base = self.require_base_url()?;
        let path = non_empty(&self.contact_path).unwrap_or(DEFAULT_CONTACT_PATH);
        Ok(join_url(base, path))
    }

    fn require_base_url(&self) -> Result<&str, ConfigError> {
        non_empty(&self.base_url).ok_or(ConfigError::Missing {
            key: ConfigKey::BaseUrl,
            env: ENV_BASE_URL,
        })
    }

    pub fn auth_token(&self) -> Option<String> {
        non_empty(&self.auth_token).map(str::to_owned)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn trailing_frames(&self) -> TrailingFramePolicy {
        self.trailing_frames.unwrap_or_default()
    }

    pub fn navigation_url(&self, target: &str) -> String {
        navigation_url(non_empty(&self.site_url), target)
    }

    /// Overlay values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(|name| std::env::var(name).ok());
    }

    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(value) = lookup(ENV_BASE_URL) {
            self.base_url = Some(value);
        }
        if let Some(value) = lookup(ENV_AUTH_TOKEN) {
            self.auth_token = Some(value);
        }
        if let Some(value) = lookup(ENV_SITE_URL) {
            self.site_url = Some(value);
        }
    }

    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                key,
                value: value.to_string(),
                reason: "value must not be empty",
            });
        }

        match key {
            ConfigKey::BaseUrl => self.base_url = Some(value.to_string()),
            ConfigKey::ChatPath => self.chat_path = Some(value.to_string()),
            ConfigKey::ContactPath => self.contact_path = Some(value.to_string()),
            ConfigKey::SiteUrl => self.site_url = Some(value.to_string()),
            ConfigKey::AuthToken => self.auth_token = Some(value.to_string()),
            ConfigKey::RequestTimeout => {
                let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key,
                    value: value.to_string(),
                    reason: "expected a whole number of seconds",
                })?;
                self.request_timeout_secs = Some(secs);
            }
            ConfigKey::TrailingFrames => {
                let policy =
                    TrailingFramePolicy::parse(value).ok_or_else(|| ConfigError::InvalidValue {
                        key,
                        value: value.to_string(),
                        reason: "expected `discard` or `error`",
                    })?;
                self.trailing_frames = Some(policy);
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::ChatPath => self.chat_path = None,
            ConfigKey::ContactPath => self.contact_path = None,
            ConfigKey::SiteUrl => self.site_url = None,
            ConfigKey::AuthToken => self.auth_token = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
            ConfigKey::TrailingFrames => self.trailing_frames = None,
        }
    }
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
