// The single background consumer that drains the queue into log files.

use crate::{
  config::{DispatcherConfig, DEFAULT_IDLE_WAKEUP},
  dispatcher::queue::LogQueue,
  error::{Error, Result},
  error_handling::{ErrorReporter, InternalErrorReceiver, InternalErrorSource},
  model::LogRecord,
  roller::{Appender, FileAppender},
};

use fibre::error::RecvErrorTimeout;
use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
  path::PathBuf,
  thread::{self, JoinHandle},
  time::Duration,
};

/// Drains a [`LogQueue`] one record at a time and hands each record to an
/// [`Appender`].
///
/// A failure or panic while handling one record is reported and the record
/// dropped; it never stops the loop. The loop ends only once every
/// `LogSender` is gone and the queue is empty.
pub struct Dispatcher<A: Appender = FileAppender> {
  queue: LogQueue,
  appender: A,
  reporter: ErrorReporter,
  idle_wakeup: Duration,
}

impl Dispatcher<FileAppender> {
  /// A dispatcher writing under `directory`. Performs no I/O.
  pub fn new<P: Into<PathBuf>>(queue: LogQueue, directory: P) -> Self {
    Self::with_appender(queue, FileAppender::new(directory))
  }

  /// Builds a file-backed dispatcher from validated settings. When error
  /// reporting is enabled, append failures, panics and path-resolution
  /// failures all go to one channel whose receiving end is returned alongside.
  pub fn from_config(
    queue: LogQueue,
    config: &DispatcherConfig,
  ) -> Result<(Self, Option<InternalErrorReceiver>)> {
    config.validate()?;
    let (reporter, error_rx) = match config.error_channel_capacity {
      Some(capacity) => {
        let (reporter, rx) = ErrorReporter::channel(capacity);
        (reporter, Some(rx))
      }
      None => (ErrorReporter::tracing_only(), None),
    };
    let appender = FileAppender::new(config.directory.clone()).with_reporter(reporter.clone());
    let dispatcher = Self {
      queue,
      appender,
      reporter,
      idle_wakeup: config.idle_wakeup,
    };
    Ok((dispatcher, error_rx))
  }
}

impl<A: Appender> Dispatcher<A> {
  pub fn with_appender(queue: LogQueue, appender: A) -> Self {
    Self {
      queue,
      appender,
      reporter: ErrorReporter::tracing_only(),
      idle_wakeup: DEFAULT_IDLE_WAKEUP,
    }
  }

  pub fn idle_wakeup(mut self, interval: Duration) -> Self {
    self.idle_wakeup = interval;
    self
  }

  /// Moves the dispatcher onto its own named, low-priority thread.
  pub fn spawn<S: Into<String>>(self, thread_name: S) -> Result<DispatcherHandle> {
    let thread_name = thread_name.into();
    let handle = thread::Builder::new()
      .name(thread_name.clone())
      .spawn(move || {
        lower_thread_priority();
        self.run();
      })
      .map_err(|source| Error::WorkerSpawn {
        thread_name: thread_name.clone(),
        source,
      })?;
    tracing::debug!(thread = %thread_name, "Log dispatcher started");
    Ok(DispatcherHandle {
      thread_name,
      handle,
    })
  }

  /// Runs the loop on the calling thread until every producer is gone.
  pub fn run(mut self) {
    loop {
      match self.queue.next_record(self.idle_wakeup) {
        Ok(record) => self.process(record),
        Err(RecvErrorTimeout::Timeout) => {
          tracing::trace!("Wait for log records interrupted, waiting again");
        }
        Err(RecvErrorTimeout::Disconnected) => {
          tracing::debug!("All log senders dropped, dispatcher exiting");
          break;
        }
      }
    }
  }

  fn process(&mut self, record: LogRecord) {
    let appender = &mut self.appender;
    match panic::catch_unwind(AssertUnwindSafe(|| appender.append(&record))) {
      Ok(Ok(())) => {}
      Ok(Err(e)) => self.reporter.report(
        InternalErrorSource::Append {
          category: record.category(),
        },
        e.to_string(),
        Some(format!("{} bytes dropped", record.text().len())),
      ),
      Err(payload) => self.reporter.report(
        InternalErrorSource::WorkerPanic,
        panic_message(payload.as_ref()),
        Some(format!("category: {}", record.category())),
      ),
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic payload".to_string()
  }
}

#[cfg(target_os = "linux")]
fn lower_thread_priority() {
  const BACKGROUND_NICE: libc::c_int = 10;
  // On Linux, PRIO_PROCESS with id 0 applies to the calling thread only.
  let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, BACKGROUND_NICE) };
  if rc != 0 {
    tracing::debug!(
      error = %std::io::Error::last_os_error(),
      "Could not lower dispatcher thread priority"
    );
  }
}

#[cfg(not(target_os = "linux"))]
fn lower_thread_priority() {}

/// Handle to a running dispatcher thread.
///
/// Dropping it detaches the thread. There is no shutdown command: the worker
/// stops after every `LogSender` has been dropped and the queue is drained.
pub struct DispatcherHandle {
  thread_name: String,
  handle: JoinHandle<()>,
}

impl DispatcherHandle {
  pub fn thread_name(&self) -> &str {
    &self.thread_name
  }

  pub fn is_finished(&self) -> bool {
    self.handle.is_finished()
  }

  /// Blocks until the worker exits.
  pub fn join(self) -> thread::Result<()> {
    self.handle.join()
  }
}
