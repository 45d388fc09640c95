mod algorithm;
mod display;
mod engine;
mod error;
mod gantt;
mod process;
mod ready_queue;
mod runner;
mod stats;

use std::time::Duration;

pub use algorithm::{Algorithm, Selector};
pub use engine::SchedulingEngine;
pub use error::{Result, SchedulerError};
pub use gantt::{GanttEntry, GanttRecord};
pub use process::{Process, ProcessSpec, ProcessStatus};
pub use ready_queue::ReadyQueue;
pub use runner::ProcessRunner;
pub use stats::Statistics;

/// How long the interactive runner waits between two steps.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(1000);
