// Producer and consumer ends of the record queue.

use crate::model::{LogCategory, LogRecord};

use fibre::{error::RecvErrorTimeout, mpsc};
use std::time::Duration;

/// Creates the unbounded FIFO shared between producers and the dispatcher.
pub fn queue() -> (LogSender, LogQueue) {
  let (tx, rx) = mpsc::unbounded::<LogRecord>();
  (LogSender { tx }, LogQueue { rx })
}

/// Producer handle. Cheap to clone; every clone feeds the same dispatcher.
///
/// Enqueueing never blocks and never touches the filesystem. It only
/// promises that the record will eventually be appended, in order with every
/// other record sent through this queue.
#[derive(Clone)]
pub struct LogSender {
  tx: mpsc::UnboundedSender<LogRecord>,
}

impl LogSender {
  /// Hands `record` to the dispatcher.
  ///
  /// Returns `false` only when the dispatcher side of the queue is gone;
  /// write failures are never reported back here.
  pub fn enqueue(&self, record: LogRecord) -> bool {
    match self.tx.send(record) {
      Ok(()) => true,
      Err(e) => {
        tracing::debug!(error = %e, "Dispatcher queue closed. Dropping log record.");
        false
      }
    }
  }

  pub fn error<S: Into<String>>(&self, text: S) -> bool {
    self.enqueue(LogRecord::new(LogCategory::Error, text))
  }

  pub fn info<S: Into<String>>(&self, text: S) -> bool {
    self.enqueue(LogRecord::new(LogCategory::Info, text))
  }

  pub fn wtf<S: Into<String>>(&self, text: S) -> bool {
    self.enqueue(LogRecord::new(LogCategory::Wtf, text))
  }

  pub fn debug<S: Into<String>>(&self, text: S) -> bool {
    self.enqueue(LogRecord::new(LogCategory::Debug, text))
  }

  pub fn crash<S: Into<String>>(&self, text: S) -> bool {
    self.enqueue(LogRecord::new(LogCategory::Crash, text))
  }

  /// Records waiting for the dispatcher.
  pub fn pending(&self) -> usize {
    self.tx.len()
  }
}

/// The dispatcher's end of the queue.
pub struct LogQueue {
  rx: mpsc::UnboundedReceiver<LogRecord>,
}

impl LogQueue {
  /// Waits up to `timeout` for the next record.
  pub(crate) fn next_record(&self, timeout: Duration) -> Result<LogRecord, RecvErrorTimeout> {
    self.rx.recv_timeout(timeout)
  }

  pub fn len(&self) -> usize {
    self.rx.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rx.is_empty()
  }
}
