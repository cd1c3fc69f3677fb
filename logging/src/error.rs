use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the `fibre_filelog` library.
#[derive(Debug, Error)]
pub enum Error {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Log record has no destination path")]
  EmptyPath,

  #[error("Ancestor directory of {path:?} is missing and too deep to create")]
  AncestorMissing { path: PathBuf },

  #[error("Failed to read configuration file {path:?}: {source}")]
  ConfigRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },

  #[error("Failed to install the log facade bridge: {0}")]
  LogBridgeInit(String),

  #[error("Failed to spawn dispatcher thread '{thread_name}': {source}")]
  WorkerSpawn {
    thread_name: String,
    #[source]
    source: std::io::Error,
  },
}

/// A specialized `Result` type for `fibre_filelog` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
