//! `fibre_filelog` - a queue-fed, single-worker plain-text file logger.
//!
//! Producers push [`LogRecord`]s onto an unbounded queue through a
//! [`LogSender`]. One background [`Dispatcher`] thread drains the queue in
//! order and appends each record's text to a file picked by its category:
//!
//! | category               | file           |
//! |------------------------|----------------|
//! | `Error`                | `errorLog.txt` |
//! | `Info`, `Wtf`, `Debug` | `log.txt`      |
//! | `Crash`                | `crash.txt`    |
//!
//! A file that has grown beyond [`MAX_LOG_SIZE`] bytes is deleted right
//! before the next append to it, so each category only ever keeps one file.
//!
//! ```no_run
//! use fibre_filelog::{DispatcherConfig, LogCategory, LogRecord};
//!
//! let started = fibre_filelog::init::start(&DispatcherConfig::new("/data/app/logs"))?;
//! started.sender.error("disk quota close to limit\n");
//! started.sender.enqueue(LogRecord::new(LogCategory::Info, "booted\n"));
//! # Ok::<(), fibre_filelog::Error>(())
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod error_handling;
pub mod init;
pub mod model;
pub mod roller;

// Re-export key public types for easier use by library consumers.
pub use config::DispatcherConfig;
pub use dispatcher::{queue, Dispatcher, DispatcherHandle, LogQueue, LogSender, QueueLogger};
pub use error::{Error, Result};
pub use error_handling::{InternalErrorReceiver, InternalErrorReport, InternalErrorSource};
pub use model::{LogCategory, LogRecord};
pub use roller::{Appender, FileAppender, MAX_LOG_SIZE};
