//! Error types for code generation

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid descriptor at '{path}': {message}")]
    SchemaValidation { path: String, message: String },

    #[error("unresolved parameter reference '{name}' at '{path}'")]
    UnresolvedParameter { name: String, path: String },

    #[error("duplicate definition '{name}' with different content")]
    NameConflict { name: String },

    #[error("malformed JSON document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SchemaValidation {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
