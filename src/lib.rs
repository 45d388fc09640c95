//! Discrete-time simulator of CPU scheduling policies.
//!
//! A [`SchedulingEngine`] holds a set of processes and advances a virtual
//! clock one decision per [`SchedulingEngine::step`], choosing the process
//! to run with one of the nine [`Algorithm`]s and recording the execution
//! history and per-process timings. [`ProcessRunner`] drives an engine
//! interactively in the terminal.

pub mod config;
pub mod scheduler;

pub use config::Workload;
pub use scheduler::{
    Algorithm, GanttEntry, GanttRecord, Process, ProcessRunner, ProcessSpec, ProcessStatus,
    ReadyQueue, SchedulerError, SchedulingEngine, Statistics, DEFAULT_TICK_RATE,
};
