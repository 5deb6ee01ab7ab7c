//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while loading, saving, or validating `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config directory or file could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing the config to RON failed.
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// A value parsed fine but is outside its allowed range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
