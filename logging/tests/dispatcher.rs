use fibre_filelog::{
  queue, Appender, Dispatcher, DispatcherConfig, FileAppender, InternalErrorSource, LogCategory,
  LogRecord, MAX_LOG_SIZE,
};
use pretty_assertions::assert_eq;
use std::{
  fs,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  thread,
};
use tempfile::tempdir;

fn read(path: &Path) -> String {
  fs::read_to_string(path).unwrap()
}

/// Wraps the file appender and notes, per append, which of `errorLog.txt`
/// and `log.txt` already existed at that moment.
struct OrderRecorder {
  inner: FileAppender,
  dir: PathBuf,
  seen: Arc<Mutex<Vec<(String, bool, bool)>>>,
}

impl Appender for OrderRecorder {
  fn append(&mut self, record: &LogRecord) -> fibre_filelog::Result<()> {
    let error_log_exists = self.dir.join("errorLog.txt").exists();
    let log_exists = self.dir.join("log.txt").exists();
    self
      .seen
      .lock()
      .unwrap()
      .push((record.text().to_string(), error_log_exists, log_exists));
    self.inner.append(record)
  }
}

#[test]
fn end_to_end_records_land_in_category_files_in_order() {
  let dir = tempdir().unwrap();
  let seen = Arc::new(Mutex::new(Vec::new()));
  let recorder = OrderRecorder {
    inner: FileAppender::new(dir.path()),
    dir: dir.path().to_path_buf(),
    seen: Arc::clone(&seen),
  };

  let (tx, rx) = queue();
  let handle = Dispatcher::with_appender(rx, recorder).spawn("filelog-e2e").unwrap();
  tx.enqueue(LogRecord::new(LogCategory::Error, "a"));
  tx.enqueue(LogRecord::new(LogCategory::Error, "b"));
  tx.enqueue(LogRecord::new(LogCategory::Info, "c"));
  drop(tx);
  handle.join().unwrap();

  assert_eq!(read(&dir.path().join("errorLog.txt")), "ab");
  assert_eq!(read(&dir.path().join("log.txt")), "c");
  assert_eq!(
    *seen.lock().unwrap(),
    vec![
      ("a".to_string(), false, false),
      ("b".to_string(), true, false),
      ("c".to_string(), true, false),
    ]
  );
}

#[test]
fn oversized_file_is_reset_before_the_next_append() {
  let dir = tempdir().unwrap();
  let crash = dir.path().join("crash.txt");
  fs::File::create(&crash)
    .unwrap()
    .set_len(MAX_LOG_SIZE + 1)
    .unwrap();

  let (tx, rx) = queue();
  let handle = Dispatcher::new(rx, dir.path()).spawn("filelog-rotate").unwrap();
  tx.crash("after reset");
  tx.crash(" and more");
  drop(tx);
  handle.join().unwrap();

  assert_eq!(read(&crash), "after reset and more");
  assert_eq!(fs::metadata(&crash).unwrap().len(), 20);
}

#[test]
fn missing_base_directory_two_levels_deep_is_created() {
  let root = tempdir().unwrap();
  let base = root.path().join("app").join("logs");

  let (tx, rx) = queue();
  let handle = Dispatcher::new(rx, &base).spawn("filelog-mkdir").unwrap();
  tx.wtf("first line\n");
  drop(tx);
  handle.join().unwrap();

  assert!(root.path().join("app").is_dir());
  assert_eq!(read(&base.join("log.txt")), "first line\n");
}

#[test]
fn failing_records_are_dropped_and_later_ones_still_written() {
  let root = tempdir().unwrap();
  let config = DispatcherConfig::new(root.path().join("logs")).error_reporting(8);

  let (tx, rx) = queue();
  let (dispatcher, errors) = Dispatcher::from_config(rx, &config).unwrap();
  let errors = errors.unwrap();

  // A non-empty directory squatting on errorLog.txt cannot be replaced.
  let blocked = root.path().join("logs").join("errorLog.txt");
  fs::create_dir_all(&blocked).unwrap();
  fs::write(blocked.join("keep"), "x").unwrap();

  tx.error("lost");
  tx.enqueue(LogRecord::new(LogCategory::Unknown, "also lost"));
  tx.info("kept");
  drop(tx);
  dispatcher.run();

  assert_eq!(read(&root.path().join("logs").join("log.txt")), "kept");
  let sources: Vec<_> = std::iter::from_fn(|| errors.try_recv().ok())
    .map(|report| report.source)
    .collect();
  assert_eq!(
    sources,
    vec![
      InternalErrorSource::Append {
        category: LogCategory::Error
      },
      InternalErrorSource::Append {
        category: LogCategory::Unknown
      },
    ]
  );
}

#[test]
fn base_path_that_is_a_file_reports_resolution_then_append() {
  let root = tempdir().unwrap();
  let base = root.path().join("logs");
  fs::write(&base, "not a directory").unwrap();
  let config = DispatcherConfig::new(&base).error_reporting(8);

  let (tx, rx) = queue();
  let (dispatcher, errors) = Dispatcher::from_config(rx, &config).unwrap();
  let errors = errors.unwrap();

  tx.info("x");
  drop(tx);
  dispatcher.run();

  let sources: Vec<_> = std::iter::from_fn(|| errors.try_recv().ok())
    .map(|report| report.source)
    .collect();
  assert_eq!(sources.len(), 2, "got {:?}", sources);
  assert!(
    matches!(&sources[0], InternalErrorSource::PathResolution { path } if path.ends_with("log.txt")),
    "got {:?}",
    sources[0]
  );
  assert_eq!(
    sources[1],
    InternalErrorSource::Append {
      category: LogCategory::Info
    }
  );
  assert_eq!(read(&base), "not a directory");
}

#[test]
fn concurrent_producers_keep_their_own_order() {
  let dir = tempdir().unwrap();
  let (tx, rx) = queue();
  let handle = Dispatcher::new(rx, dir.path()).spawn("filelog-mp").unwrap();

  let producers: Vec<_> = (0..4)
    .map(|p| {
      let tx = tx.clone();
      thread::spawn(move || {
        for i in 0..50 {
          tx.debug(format!("{}:{}\n", p, i));
        }
      })
    })
    .collect();
  for producer in producers {
    producer.join().unwrap();
  }
  drop(tx);
  handle.join().unwrap();

  let content = read(&dir.path().join("log.txt"));
  let lines: Vec<&str> = content.lines().collect();
  assert_eq!(lines.len(), 200);
  for p in 0..4 {
    let own: Vec<String> = lines
      .iter()
      .filter(|l| l.starts_with(&format!("{}:", p)))
      .map(|l| l.to_string())
      .collect();
    let expected: Vec<String> = (0..50).map(|i| format!("{}:{}", p, i)).collect();
    assert_eq!(own, expected);
  }
}
