use crate::error::{Error, Result};
use crate::error_handling::{ErrorReporter, InternalErrorSource};
use crate::model::LogRecord;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Size, in bytes, past which a log file is deleted before the next append.
pub const MAX_LOG_SIZE: u64 = 2024 * 1000;

const LOG_FILE_EXTENSION: &str = "txt";

/// Something the dispatcher can hand records to, one at a time.
pub trait Appender: Send + 'static {
  /// Persists a single record. Errors are reported by the caller and the
  /// record is dropped; implementations must not retry.
  fn append(&mut self, record: &LogRecord) -> Result<()>;
}

/// Returns `<directory>/<prefix>.txt` without touching the filesystem.
pub fn log_file_path(directory: &Path, prefix: &str) -> PathBuf {
  directory.join(format!("{}.{}", prefix, LOG_FILE_EXTENSION))
}

/// Deletes `path` if the directory exists and the file is larger than
/// [`MAX_LOG_SIZE`]. Returns whether a reset happened.
pub fn reset_if_oversized(directory: &Path, path: &Path) -> Result<bool> {
  if !directory.exists() {
    return Ok(false);
  }
  let metadata = match fs::metadata(path) {
    Ok(metadata) => metadata,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
    Err(e) => return Err(e.into()),
  };
  if metadata.is_file() && metadata.len() > MAX_LOG_SIZE {
    fs::remove_file(path)?;
    return Ok(true);
  }
  Ok(false)
}

/// Appends `text` verbatim to the file at `path`.
///
/// Up to two missing ancestor levels (grandparent, then parent) are created.
/// An empty directory sitting at `path` is replaced by an empty file.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
  if path.as_os_str().is_empty() {
    return Err(Error::EmptyPath);
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    if !parent.exists() {
      if let Some(grandparent) = parent.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !grandparent.exists() {
          create_one_dir(grandparent)?;
        }
      }
      create_one_dir(parent)?;
    }
  }

  if path.is_dir() {
    fs::remove_dir(path)?;
    fs::File::create(path)?;
  }

  let mut file = OpenOptions::new().create(true).append(true).open(path)?;
  file.write_all(text.as_bytes())?;
  file.flush()?;
  Ok(())
}

/// Creates exactly one directory level. A missing ancestor above it is
/// reported as [`Error::AncestorMissing`].
fn create_one_dir(dir: &Path) -> Result<()> {
  match fs::create_dir(dir) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::AncestorMissing {
      path: dir.to_path_buf(),
    }),
    Err(e) => Err(e.into()),
  }
}

/// Writes records to `<directory>/<prefix>.txt`, one file per category class.
pub struct FileAppender {
  directory: PathBuf,
  reporter: ErrorReporter,
}

impl FileAppender {
  /// No I/O happens here; directories are created lazily on first append.
  pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
    Self {
      directory: directory.into(),
      reporter: ErrorReporter::tracing_only(),
    }
  }

  pub(crate) fn with_reporter(mut self, reporter: ErrorReporter) -> Self {
    self.reporter = reporter;
    self
  }

  /// Computes the current file for `prefix`, deleting it first if it has
  /// outgrown [`MAX_LOG_SIZE`].
  ///
  /// The candidate path is returned even when the size check fails; the
  /// failure is reported and the append is still attempted.
  pub fn resolve_last_log_file(&self, prefix: &str) -> PathBuf {
    let path = log_file_path(&self.directory, prefix);
    match reset_if_oversized(&self.directory, &path) {
      Ok(true) => tracing::debug!(path = %path.display(), "Log file exceeded size limit, reset"),
      Ok(false) => {}
      Err(e) => self.reporter.report(
        InternalErrorSource::PathResolution {
          path: path.display().to_string(),
        },
        e.to_string(),
        Some(format!("prefix: {}", prefix)),
      ),
    }
    path
  }

  /// The destination for `record`, or an empty path when its category names
  /// no file.
  pub fn resolve_record_path(&self, record: &LogRecord) -> PathBuf {
    match record.category().file_prefix() {
      Some(prefix) => self.resolve_last_log_file(prefix),
      None => PathBuf::new(),
    }
  }
}

impl Appender for FileAppender {
  fn append(&mut self, record: &LogRecord) -> Result<()> {
    let path = self.resolve_record_path(record);
    append_text(&path, record.text())
  }
}
