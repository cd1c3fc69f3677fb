// The queue, its single consumer, and the `log` facade adapter feeding it.

mod bridge;
mod queue;
mod worker;

pub use bridge::QueueLogger;
pub use queue::{queue, LogQueue, LogSender};
pub use worker::{Dispatcher, DispatcherHandle};
