use std::{fmt, str::FromStr};

/// The class of a log record, which decides the file it lands in.
///
/// Several categories share a file: `Info`, `Wtf` and `Debug` all go to
/// `log.txt`. `Unknown` names no file at all and such records are dropped
/// by the dispatcher with an internal error report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
  Error,
  Info,
  Wtf,
  Debug,
  Crash,
  Unknown,
}

impl LogCategory {
  /// The file name stem records of this category are appended to.
  pub fn file_prefix(self) -> Option<&'static str> {
    match self {
      LogCategory::Error => Some("errorLog"),
      LogCategory::Info | LogCategory::Wtf | LogCategory::Debug => Some("log"),
      LogCategory::Crash => Some("crash"),
      LogCategory::Unknown => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      LogCategory::Error => "error",
      LogCategory::Info => "info",
      LogCategory::Wtf => "wtf",
      LogCategory::Debug => "debug",
      LogCategory::Crash => "crash",
      LogCategory::Unknown => "unknown",
    }
  }
}

impl fmt::Display for LogCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Parsing never fails: anything unrecognised becomes `Unknown`.
impl FromStr for LogCategory {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let category = match s.trim().to_ascii_lowercase().as_str() {
      "error" => LogCategory::Error,
      "info" => LogCategory::Info,
      "wtf" => LogCategory::Wtf,
      "debug" => LogCategory::Debug,
      "crash" => LogCategory::Crash,
      _ => LogCategory::Unknown,
    };
    Ok(category)
  }
}

impl From<log::Level> for LogCategory {
  fn from(level: log::Level) -> Self {
    match level {
      log::Level::Error => LogCategory::Error,
      log::Level::Warn => LogCategory::Wtf,
      log::Level::Info => LogCategory::Info,
      log::Level::Debug | log::Level::Trace => LogCategory::Debug,
    }
  }
}

/// One entry waiting to be persisted.
///
/// `text` is appended verbatim; no newline, timestamp or other decoration is
/// added on the way to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
  category: LogCategory,
  text: String,
}

impl LogRecord {
  pub fn new<S: Into<String>>(category: LogCategory, text: S) -> Self {
    LogRecord {
      category,
      text: text.into(),
    }
  }

  pub fn category(&self) -> LogCategory {
    self.category
  }

  pub fn text(&self) -> &str {
    &self.text
  }
}
