use std::fmt;

use fibre::{error::TrySendError, mpsc};

use crate::model::LogCategory;

/// Where inside the dispatcher an internal failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalErrorSource {
  /// Inspecting or deleting an over-sized log file failed.
  PathResolution { path: String },
  /// Writing a record failed; the record was dropped.
  Append { category: LogCategory },
  /// Handling a single record panicked; the worker kept running.
  WorkerPanic,
}

impl fmt::Display for InternalErrorSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InternalErrorSource::PathResolution { path } => {
        write!(f, "PathResolution {{ path: \"{}\" }}", path)
      }
      InternalErrorSource::Append { category } => write!(f, "Append {{ category: {} }}", category),
      InternalErrorSource::WorkerPanic => write!(f, "WorkerPanic"),
    }
  }
}

#[derive(Debug)]
pub struct InternalErrorReport {
  pub source: InternalErrorSource,
  pub error_message: String,
  pub context: Option<String>,
  pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl InternalErrorReport {
  pub(crate) fn new(
    source: InternalErrorSource,
    error_message: impl Into<String>,
    context: Option<String>,
  ) -> Self {
    Self {
      source,
      error_message: error_message.into(),
      context,
      timestamp: chrono::Utc::now(),
    }
  }
}

pub type InternalErrorReceiver = mpsc::BoundedReceiver<InternalErrorReport>;

/// Routes internal failures either to an application-supplied channel or,
/// when none is wired up, to `tracing`.
#[derive(Clone, Default)]
pub(crate) struct ErrorReporter {
  tx: Option<mpsc::BoundedSender<InternalErrorReport>>,
}

impl ErrorReporter {
  /// A reporter that only emits through `tracing`.
  pub(crate) fn tracing_only() -> Self {
    Self { tx: None }
  }

  /// A reporter backed by a bounded channel, plus the receiving end for the host.
  pub(crate) fn channel(capacity: usize) -> (Self, InternalErrorReceiver) {
    let (tx, rx) = mpsc::bounded(capacity);
    (Self { tx: Some(tx) }, rx)
  }

  pub(crate) fn report(
    &self,
    source: InternalErrorSource,
    error_message: impl Into<String>,
    context: Option<String>,
  ) {
    let report = InternalErrorReport::new(source, error_message, context);
    let Some(tx) = &self.tx else {
      Self::emit(&report);
      return;
    };
    match tx.try_send(report) {
      Ok(()) => {}
      Err(TrySendError::Full(dropped)) => {
        tracing::warn!(
          source = %dropped.source,
          "Internal error channel full. Dropping error report."
        );
      }
      // Nobody is listening on the channel any more.
      Err(undelivered) => Self::emit(&undelivered.into_inner()),
    }
  }

  fn emit(report: &InternalErrorReport) {
    tracing::error!(
      source = %report.source,
      context = report.context.as_deref().unwrap_or(""),
      "{}",
      report.error_message
    );
  }
}
