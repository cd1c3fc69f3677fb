// Entry points that wire a queue, a dispatcher and its thread together.

use crate::{
  config::DispatcherConfig,
  dispatcher::{queue, Dispatcher, DispatcherHandle, LogSender},
  error::Result,
  error_handling::InternalErrorReceiver,
};

use std::path::Path;

/// Everything a host needs after starting a dispatcher.
pub struct StartResult {
  /// Producer handle; clone it for every component that logs.
  pub sender: LogSender,
  /// The worker thread. It exits once every sender has been dropped.
  pub handle: DispatcherHandle,
  /// Present when `error_reporting` was enabled in the configuration.
  pub internal_error_rx: Option<InternalErrorReceiver>,
}

/// Creates the queue and starts a dispatcher thread for `config`.
pub fn start(config: &DispatcherConfig) -> Result<StartResult> {
  let (sender, log_queue) = queue();
  let (dispatcher, internal_error_rx) = Dispatcher::from_config(log_queue, config)?;
  let handle = dispatcher.spawn(config.thread_name.clone())?;
  tracing::info!(
    directory = %config.directory.display(),
    thread = %config.thread_name,
    "File log dispatcher running"
  );
  Ok(StartResult {
    sender,
    handle,
    internal_error_rx,
  })
}

/// Loads a YAML configuration file and starts a dispatcher from it.
pub fn start_from_file(config_path: &Path) -> Result<StartResult> {
  let config = DispatcherConfig::from_file(config_path)?;
  start(&config)
}
