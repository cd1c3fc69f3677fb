// Lets code written against the `log` facade feed the dispatcher queue.

use crate::{
  dispatcher::queue::LogSender,
  error::{Error, Result},
  model::{LogCategory, LogRecord},
};

use log::{LevelFilter, Log, Metadata, Record};

/// A `log::Log` implementation that turns each record into one line of text
/// and enqueues it under the category matching its level.
pub struct QueueLogger {
  sender: LogSender,
  max_level: LevelFilter,
}

impl QueueLogger {
  pub fn new(sender: LogSender, max_level: LevelFilter) -> Self {
    Self { sender, max_level }
  }

  /// Installs this logger as the process-wide `log` backend.
  pub fn install(self) -> Result<()> {
    let max_level = self.max_level;
    log::set_boxed_logger(Box::new(self)).map_err(|e| Error::LogBridgeInit(e.to_string()))?;
    log::set_max_level(max_level);
    Ok(())
  }

  fn render(record: &Record<'_>) -> String {
    format!(
      "{} {:<5} {} - {}\n",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
      record.level(),
      record.target(),
      record.args()
    )
  }
}

impl Log for QueueLogger {
  fn enabled(&self, metadata: &Metadata<'_>) -> bool {
    metadata.level() <= self.max_level
  }

  fn log(&self, record: &Record<'_>) {
    if !self.enabled(record.metadata()) {
      return;
    }
    let category = LogCategory::from(record.level());
    self
      .sender
      .enqueue(LogRecord::new(category, Self::render(record)));
  }

  fn flush(&self) {}
}
