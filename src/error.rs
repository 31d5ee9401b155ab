//! All error types for the locsync crate.
//!
//! These are returned from every fallible operation (loading, parsing,
//! reconciling, writing, configuration).

use std::{path::PathBuf, string::FromUtf8Error};

use thiserror::Error;

use crate::tree::NodeKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("{} is not valid UTF-8: {source}", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("structural mismatch at `{key}`: expected {expected}, found {found}")]
    StructuralMismatch {
        key: String,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("unsupported value at `{key}`: expected an object, found {kind}")]
    UnsupportedValue { key: String, kind: &'static str },

    /// Two leaves flatten to the same key, e.g. `"a.b"` next to `{"a": {"b"}}`.
    #[error("duplicate flat key `{0}`")]
    DuplicateKey(String),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("language `{language}`: {source}")]
    Language {
        language: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a structural mismatch error for the given flat key.
    pub fn structural_mismatch(key: impl Into<String>, expected: NodeKind, found: NodeKind) -> Self {
        Error::StructuralMismatch {
            key: key.into(),
            expected,
            found,
        }
    }

    /// Wraps this error with the language it happened in.
    pub fn in_language(self, language: impl Into<String>) -> Self {
        Error::Language {
            language: language.into(),
            source: Box::new(self),
        }
    }
}
