use std::path::PathBuf;

use thiserror::Error;

/// Why a link of a recognized scheme could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplodeError {
    #[error("malformed payload")]
    MalformedPayload,

    #[error("invalid base64")]
    InvalidBase64,

    #[error("invalid json")]
    InvalidJson,

    #[error("missing host")]
    MissingHost,

    #[error("invalid port")]
    InvalidPort,

    #[error("missing credential")]
    MissingCredential,
}

/// A decoded node the target format cannot represent. The node is left out
/// of the document; the rest of the encode continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}: {reason}")]
pub struct EncodeWarning {
    pub name: String,
    pub reason: String,
}

impl EncodeWarning {
    pub fn unsupported(name: &str, reason: impl Into<String>) -> Self {
        EncodeWarning {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Run-level failures. Only these abort a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to read source {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no nodes to encode ({lines} non-blank lines read)")]
    EmptyResult { lines: usize },

    #[error("failed to write destination {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("invalid settings: {0}")]
    Settings(String),
}
