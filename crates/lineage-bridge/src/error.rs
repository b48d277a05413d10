use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse classfile for `{name}`: {source}")]
    Classfile {
        name: String,
        #[source]
        source: lineage_classfile::Error,
    },
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid loader configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("class `{0}` not found")]
    MissingClass(String),
    #[error("classfile for `{expected}` declares `{found}`")]
    NameMismatch { expected: String, found: String },
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;
