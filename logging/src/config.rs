// Configuration for a dispatcher: either built in code or loaded from YAML.

use crate::error::{Error, Result};

use serde::Deserialize;
use std::{
  fs::File,
  io::BufReader,
  path::{Path, PathBuf},
  time::Duration,
};

pub const DEFAULT_THREAD_NAME: &str = "fibre-filelog";
pub const DEFAULT_IDLE_WAKEUP: Duration = Duration::from_secs(1);
pub const DEFAULT_ERROR_CHANNEL_CAPACITY: usize = 256;

/// Settings for one dispatcher worker.
///
/// The size threshold for log files is fixed at
/// [`MAX_LOG_SIZE`](crate::roller::MAX_LOG_SIZE) and is not part of this.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
  /// Base directory holding `log.txt`, `errorLog.txt` and `crash.txt`.
  pub directory: PathBuf,
  /// Name given to the worker thread.
  pub thread_name: String,
  /// How long a single wait on the queue lasts before it is abandoned and
  /// restarted.
  pub idle_wakeup: Duration,
  /// When set, internal failures are delivered on a bounded channel of this
  /// capacity instead of being emitted through `tracing`.
  pub error_channel_capacity: Option<usize>,
}

impl DispatcherConfig {
  pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
    Self {
      directory: directory.into(),
      thread_name: DEFAULT_THREAD_NAME.to_string(),
      idle_wakeup: DEFAULT_IDLE_WAKEUP,
      error_channel_capacity: None,
    }
  }

  pub fn thread_name<S: Into<String>>(mut self, name: S) -> Self {
    self.thread_name = name.into();
    self
  }

  pub fn idle_wakeup(mut self, interval: Duration) -> Self {
    self.idle_wakeup = interval;
    self
  }

  pub fn error_reporting(mut self, capacity: usize) -> Self {
    self.error_channel_capacity = Some(capacity);
    self
  }

  /// Loads and validates a YAML configuration file.
  pub fn from_file(path: &Path) -> Result<Self> {
    let file = File::open(path).map_err(|source| Error::ConfigRead {
      path: path.to_path_buf(),
      source,
    })?;
    let raw: ConfigRaw = serde_yaml::from_reader(BufReader::new(file))
      .map_err(|e| Error::ConfigParse(e.to_string()))?;
    raw.process()
  }

  /// Parses and validates YAML held in memory.
  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    let raw: ConfigRaw =
      serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))?;
    raw.process()
  }

  pub(crate) fn validate(&self) -> Result<()> {
    if self.directory.as_os_str().is_empty() {
      return Err(Error::InvalidConfigValue {
        field: "directory".to_string(),
        message: "must not be empty".to_string(),
      });
    }
    if self.thread_name.is_empty() {
      return Err(Error::InvalidConfigValue {
        field: "thread_name".to_string(),
        message: "must not be empty".to_string(),
      });
    }
    if self.idle_wakeup.is_zero() {
      return Err(Error::InvalidConfigValue {
        field: "idle_wakeup".to_string(),
        message: "must be greater than zero".to_string(),
      });
    }
    if self.error_channel_capacity == Some(0) {
      return Err(Error::InvalidConfigValue {
        field: "error_reporting.buffer_size".to_string(),
        message: "must be greater than zero".to_string(),
      });
    }
    Ok(())
  }
}

// --- Raw YAML shape ---

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
struct ErrorReportingRaw {
  #[serde(default)]
  enabled: bool,
  #[serde(default = "default_buffer_size")]
  buffer_size: usize,
}

fn default_buffer_size() -> usize {
  DEFAULT_ERROR_CHANNEL_CAPACITY
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigRaw {
  directory: String,
  #[serde(default)]
  thread_name: Option<String>,
  /// Human readable, e.g. "500ms" or "2s".
  #[serde(default)]
  idle_wakeup: Option<String>,
  #[serde(default)]
  error_reporting: ErrorReportingRaw,
}

impl ConfigRaw {
  fn process(self) -> Result<DispatcherConfig> {
    let mut config = DispatcherConfig::new(self.directory);
    if let Some(name) = self.thread_name {
      config.thread_name = name;
    }
    if let Some(interval) = self.idle_wakeup {
      config.idle_wakeup =
        humantime::parse_duration(&interval).map_err(|e| Error::InvalidConfigValue {
          field: "idle_wakeup".to_string(),
          message: e.to_string(),
        })?;
    }
    if self.error_reporting.enabled {
      config.error_channel_capacity = Some(self.error_reporting.buffer_size);
    }
    config.validate()?;
    Ok(config)
  }
}
