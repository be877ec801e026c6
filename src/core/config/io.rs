use crate::core::config::data::{path_display, Config, ConfigKey};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Config`].
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    Serialize(toml::ser::Error),

    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No home directory to place the configuration file in.
    NoConfigDir,

    /// A setting required for the requested operation is unset.
    Missing {
        key: ConfigKey,
        env: &'static str,
    },

    UnknownKey(String),

    InvalidValue {
        key: ConfigKey,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path_display(path), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path_display(path), source)
            }
            ConfigError::Serialize(source) => write!(f, "Failed to serialize config: {source}"),
            ConfigError::Write { path, source } => {
                write!(f, "Failed to write config at {}: {}", path_display(path), source)
            }
            ConfigError::NoConfigDir => f.write_str("Failed to determine config directory"),
            ConfigError::Missing { key, env } => write!(
                f,
                "{} is not configured; run `gem-assist set {} <value>` or set {}",
                key.name(),
                key.name(),
                env
            ),
            ConfigError::UnknownKey(key) => {
                let known: Vec<_> = ConfigKey::ALL.iter().map(|key| key.name()).collect();
                write!(f, "Unknown config key `{key}` (expected one of: {})", known.join(", "))
            }
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "Invalid value `{value}` for {}: {reason}", key.name())
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } | ConfigError::Write { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(source) => Some(source),
            _ => None,
        }
    }
}

impl Config {
    /// Load the user config and overlay environment overrides.
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_with_env(&Self::config_path()?)
    }

    /// Same as [`Config::load`] for a file at an explicit location.
    pub fn load_with_env(config_path: &Path) -> Result<Config, ConfigError> {
        let mut config = Self::load_from_path(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Atomically replace the file at `config_path`.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;

        temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(config_path)
            .map_err(|err| write_err(err.error))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("com", "GEM Enterprise", "gem-assist").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
