// Configuration: where the API lives and which key to use. Environment
// variables win over the optional JSON file in the user's config dir; the
// key can also be typed in when running on a terminal.

use crate::error::ConfigError;
use dialoguer::Password;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "BLUEINK_PRIVATE_API_KEY";
pub const BASE_URL_ENV: &str = "BLUEINK_API_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.blueink.com/api/v2";

const CONFIG_DIRNAME: &str = "blueink-examples";
const CONFIG_FILENAME: &str = "config.json";

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl FileConfig {
    /// Load the file, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIRNAME).join(CONFIG_FILENAME))
    }

    /// Resolve from the process environment and the default config file,
    /// asking for the key on the terminal as a last resort.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let file = match &path {
            Some(p) => FileConfig::load(p)?,
            None => FileConfig::default(),
        };
        let location = path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| CONFIG_FILENAME.to_string());

        match Self::resolve(file.clone(), |k| std::env::var(k).ok()) {
            Some(config) => Ok(config),
            None if std::io::stdin().is_terminal() => {
                let api_key: String = Password::new()
                    .with_prompt("BlueInk private API key")
                    .interact()?;
                Ok(Self {
                    api_key,
                    base_url: resolve_base_url(&file, |k| std::env::var(k).ok()),
                })
            }
            None => Err(ConfigError::MissingApiKey(location)),
        }
    }

    /// Merge the file with an environment lookup. Returns `None` when no
    /// API key is available from either source.
    pub fn resolve<F>(file: FileConfig, env: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = resolve_base_url(&file, &env);
        let api_key = non_empty(env(API_KEY_ENV)).or_else(|| non_empty(file.api_key))?;
        debug!(%base_url, "resolved API configuration");
        Some(Self { api_key, base_url })
    }
}

fn resolve_base_url<F>(file: &FileConfig, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(env(BASE_URL_ENV))
        .or_else(|| non_empty(file.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
