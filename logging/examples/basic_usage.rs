// examples/basic_usage.rs

use fibre_filelog::{DispatcherConfig, QueueLogger};
use log::LevelFilter;
use std::thread;
use std::time::Duration;

fn main() -> fibre_filelog::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let directory = std::env::temp_dir().join("fibre_filelog_demo").join("logs");
  let config = DispatcherConfig::new(&directory)
    .thread_name("demo-log-writer")
    .idle_wakeup(Duration::from_millis(250));

  let started = fibre_filelog::init::start(&config)?;

  // Plain producer calls: text is written exactly as given.
  started.sender.info("demo started\n");
  started.sender.crash("pretend crash dump\n");

  // `log` macros go through the same queue.
  QueueLogger::new(started.sender.clone(), LevelFilter::Debug).install()?;

  let workers: Vec<_> = (0..3)
    .map(|id| {
      thread::spawn(move || {
        for i in 0..5 {
          log::info!("worker {} step {}", id, i);
        }
        log::error!("worker {} finished with a simulated error", id);
      })
    })
    .collect();
  for worker in workers {
    worker.join().expect("worker thread panicked");
  }

  // The boxed `log` backend keeps one sender alive for the rest of the
  // process, so give the dispatcher a moment instead of joining it.
  drop(started.sender);
  thread::sleep(Duration::from_millis(500));

  println!("Check {} for log.txt, errorLog.txt and crash.txt", directory.display());
  Ok(())
}
