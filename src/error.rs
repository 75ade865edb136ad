//! Crate-wide error type.
//!
//! One flat enum: the pipeline is small enough that layered error types would
//! just add conversion noise. CLI glue wraps this in `anyhow` for context.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Extension is not in the format registry.
    #[error("files with extension `{0}` are not supported yet, use .yaml, .json or .toml")]
    NotSupportedFormat(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("cannot serialize to {}: {message}", .path.display())]
    Emit { path: PathBuf, message: String },

    /// A value kind the schema inferencer has no type tag for.
    #[error("cannot infer a type for `{path}`: {found} values are not supported")]
    Inference { path: String, found: &'static str },

    /// Two source keys sanitized to the same record name.
    #[error("record name `{name}` generated twice (source key `{path}`)")]
    DuplicateRecord { name: String, path: String },

    #[error("missing field `{key}`")]
    MissingField { key: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Adds the field key to an error raised while decoding that field.
    #[error("field `{key}`: {source}")]
    Field {
        key: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn in_field(self, key: &str) -> Self {
        Self::Field {
            key: key.to_string(),
            source: Box::new(self),
        }
    }
}
