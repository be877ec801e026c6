use super::data::{Config, ConfigKey, ENV_AUTH_TOKEN, ENV_BASE_URL, ENV_SITE_URL};
use super::io::ConfigError;
use crate::core::chat_stream::TrailingFramePolicy;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn missing_file_loads_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = Config::load_from_path(&temp_dir.path().join("config.toml")).expect("load failed");
    assert_eq!(config, Config::default());
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        base_url: Some("https://project.example.co".to_string()),
        auth_token: Some("anon".to_string()),
        request_timeout_secs: Some(30),
        trailing_frames: Some(TrailingFramePolicy::Error),
        ..Default::default()
    };
    config.save_to_path(&config_path).expect("save failed");

    let contents = fs::read_to_string(&config_path).expect("read failed");
    assert!(contents.contains("trailing_frames = \"error\""), "{contents}");
    assert!(!contents.contains("chat_path"), "unset keys are omitted: {contents}");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded, config);
}

#[test]
fn invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "base_url = [").expect("write failed");

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"), "{err}");
}

#[test]
fn unknown_policy_value_is_a_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "trailing_frames = \"retry\"\n").expect("write failed");

    assert!(matches!(
        Config::load_from_path(&config_path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn endpoint_urls_use_default_paths() {
    let config = Config {
        base_url: Some("https://project.example.co/".to_string()),
        ..Default::default()
    };
    assert_eq!(
        config.chat_url().unwrap(),
        "https://project.example.co/functions/v1/gem-assist"
    );
    assert_eq!(
        config.contact_url().unwrap(),
        "https://project.example.co/functions/v1/contact-form"
    );

    let custom = Config {
        chat_path: Some("/chat".to_string()),
        ..config
    };
    assert_eq!(custom.chat_url().unwrap(), "https://project.example.co/chat");
}

#[test]
fn missing_base_url_names_the_fix() {
    let err = Config::default().chat_url().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("gem-assist set base-url"), "{message}");
    assert!(message.contains(ENV_BASE_URL), "{message}");
}

#[test]
fn env_overrides_replace_file_values() {
    let mut config = Config {
        base_url: Some("https://file.example".to_string()),
        site_url: Some("https://site.example".to_string()),
        ..Default::default()
    };
    let env: HashMap<&str, &str> = [
        (ENV_BASE_URL, "https://env.example"),
        (ENV_AUTH_TOKEN, "env-token"),
        (ENV_SITE_URL, "  "),
    ]
    .into_iter()
    .collect();

    config.apply_env_overrides_with(|name| env.get(name).map(|value| value.to_string()));

    assert_eq!(config.base_url.as_deref(), Some("https://env.example"));
    assert_eq!(config.auth_token().as_deref(), Some("env-token"));
    assert_eq!(config.site_url.as_deref(), Some("https://site.example"));
}

#[test]
fn set_and_unset_values() {
    let mut config = Config::default();

    config
        .set_value(ConfigKey::parse("request_timeout").unwrap(), "45")
        .unwrap();
    config
        .set_value(ConfigKey::parse("Trailing-Frames").unwrap(), "error")
        .unwrap();
    config.set_value(ConfigKey::SiteUrl, "https://gem.example").unwrap();

    assert_eq!(config.request_timeout(), Some(Duration::from_secs(45)));
    assert_eq!(config.trailing_frames(), TrailingFramePolicy::Error);
    assert_eq!(config.navigation_url("/contact"), "https://gem.example/contact");

    config.unset_value(ConfigKey::TrailingFrames);
    config.unset_value(ConfigKey::SiteUrl);
    assert_eq!(config.trailing_frames(), TrailingFramePolicy::Discard);
    assert_eq!(config.navigation_url("/contact"), "/contact");
}

#[test]
fn invalid_settings_are_rejected() {
    let mut config = Config::default();

    assert!(matches!(
        ConfigKey::parse("theme"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert!(matches!(
        config.set_value(ConfigKey::RequestTimeout, "soon"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value(ConfigKey::TrailingFrames, "retry"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value(ConfigKey::BaseUrl, "   "),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(config, Config::default());
}

#[test]
fn zero_timeout_means_none() {
    let config = Config {
        request_timeout_secs: Some(0),
        ..Default::default()
    };
    assert_eq!(config.request_timeout(), None);
}

#[test]
fn describe_hides_token() {
    let config = Config {
        auth_token: Some("secret-value".to_string()),
        ..Default::default()
    };
    let text = config.describe();
    assert!(text.contains("auth-token: (set)"), "{text}");
    assert!(!text.contains("secret-value"));
    assert!(text.contains("chat-path: functions/v1/gem-assist"));
    assert!(text.contains("trailing-frames: discard"));
}
