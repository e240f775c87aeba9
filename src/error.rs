// Error types shared by the library. The UI layer wraps these in
// `anyhow::Error`; keeping the enums typed lets callers tell a closed
// stdin apart from a failed HTTP call.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the interactive prompt primitives.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input closed")]
    InputClosed,

    #[error("no valid answer to '{prompt}' after {attempts} attempts")]
    RetriesExhausted { prompt: String, attempts: usize },

    #[error("nothing to choose from for '{0}'")]
    NoChoices(String),
}

/// Rejected builder operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HelperError {
    #[error("not a readable file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("a signer with key '{0}' already exists")]
    DuplicateSigner(String),

    #[error("no document with key '{0}'")]
    UnknownDocument(String),

    #[error("no signer with key '{0}'")]
    UnknownSigner(String),
}

/// Failures talking to the BlueInk API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Start-up configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no API key: set BLUEINK_PRIVATE_API_KEY or add api_key to {0}")]
    MissingApiKey(String),

    #[error("failed to read API key: {0}")]
    Prompt(#[from] std::io::Error),
}
