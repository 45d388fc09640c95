use super::error::{Result, SchedulerError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Not yet arrived, or arrived but not yet admitted to the ready queue.
    Ready,
    /// Sitting in the ready queue.
    Waiting,
    /// Selected for the current tick.
    Running,
    Completed,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessStatus::Ready => "ready",
            ProcessStatus::Waiting => "waiting",
            ProcessStatus::Running => "running",
            ProcessStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pid: usize,
    name: String,
    arrival_time: u32,
    burst_time: u32,
    original_priority: i32,

    priority: i32,
    remaining_burst_time: u32,
    status: ProcessStatus,
    first_run_time: Option<u32>,
    completion_time: Option<u32>,
}

impl Process {
    pub const DEFAULT_PRIORITY: i32 = 5;

    pub fn new(pid: usize, name: &str, arrival_time: u32, burst_time: u32) -> Self {
        Process::with_priority(pid, name, arrival_time, burst_time, Process::DEFAULT_PRIORITY)
    }

    pub fn with_priority(
        pid: usize,
        name: &str,
        arrival_time: u32,
        burst_time: u32,
        priority: i32,
    ) -> Self {
        Self {
            pid,
            name: name.to_owned(),
            arrival_time,
            burst_time,
            original_priority: priority,
            priority,
            remaining_burst_time: burst_time,
            status: ProcessStatus::Ready,
            first_run_time: None,
            completion_time: None,
        }
    }

    pub fn pid(&self) -> usize {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arrival_time(&self) -> u32 {
        self.arrival_time
    }

    /// The original execution demand.
    pub fn burst_time(&self) -> u32 {
        self.burst_time
    }

    pub fn remaining_burst_time(&self) -> u32 {
        self.remaining_burst_time
    }

    /// The current priority, which aging may have lowered below the original.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn original_priority(&self) -> i32 {
        self.original_priority
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProcessStatus::Completed
    }

    pub fn first_run_time(&self) -> Option<u32> {
        self.first_run_time
    }

    pub fn completion_time(&self) -> Option<u32> {
        self.completion_time
    }

    pub fn turnaround_time(&self) -> Option<u32> {
        self.completion_time
            .map(|completion| completion - self.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<u32> {
        self.turnaround_time()
            .map(|turnaround| turnaround - self.burst_time)
    }

    pub fn response_time(&self) -> Option<u32> {
        self.first_run_time
            .map(|first_run| first_run - self.arrival_time)
    }

    /// Ticks this process has waited since it arrived, as seen at `clock`.
    pub fn time_since_arrival(&self, clock: u32) -> u32 {
        clock.saturating_sub(self.arrival_time)
    }

    /// `(waited + burst) / burst`, the HRRN ordering key.
    pub fn response_ratio(&self, clock: u32) -> f64 {
        let burst = f64::from(self.burst_time);
        (f64::from(self.time_since_arrival(clock)) + burst) / burst
    }

    pub fn reset(&mut self) {
        self.priority = self.original_priority;
        self.remaining_burst_time = self.burst_time;
        self.status = ProcessStatus::Ready;
        self.first_run_time = None;
        self.completion_time = None;
    }

    pub(super) fn admit(&mut self) {
        self.status = ProcessStatus::Waiting;
    }

    pub(super) fn dispatch(&mut self, clock: u32) {
        self.status = ProcessStatus::Running;
        if self.first_run_time.is_none() {
            self.first_run_time = Some(clock);
        }
    }

    /// Runs for `ticks` units ending at `end`. Returns true if the process
    /// finished, otherwise it goes back to waiting.
    pub(super) fn execute(&mut self, ticks: u32, end: u32) -> bool {
        self.remaining_burst_time -= ticks;
        if self.remaining_burst_time == 0 {
            self.completion_time = Some(end);
            self.status = ProcessStatus::Completed;
            true
        } else {
            self.status = ProcessStatus::Waiting;
            false
        }
    }

    pub(super) fn age(&mut self) {
        self.priority -= 1;
    }
}

/// Unvalidated process parameters as entered by a user, e.g. `P1:0:4:2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub name: String,
    pub arrival_time: u32,
    pub burst_time: u32,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    Process::DEFAULT_PRIORITY
}

impl ProcessSpec {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SchedulerError::InvalidInput(
                "process name must not be empty".to_owned(),
            ));
        }
        if self.burst_time == 0 {
            return Err(SchedulerError::InvalidInput(format!(
                "burst time of {} must be positive",
                self.name
            )));
        }
        Ok(())
    }
}

impl FromStr for ProcessSpec {
    type Err = SchedulerError;

    /// Parses `name:arrival:burst[:priority]`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |what: &str| SchedulerError::InvalidInput(format!("{what} in {s:?}"));

        let mut parts = s.split(':').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let arrival = parts.next().ok_or_else(|| invalid("missing arrival time"))?;
        let burst = parts.next().ok_or_else(|| invalid("missing burst time"))?;
        let priority = parts.next();
        if parts.next().is_some() {
            return Err(invalid("too many fields"));
        }

        let spec = ProcessSpec {
            name: name.to_owned(),
            arrival_time: arrival
                .parse()
                .map_err(|_| invalid("arrival time is not a non-negative integer"))?,
            burst_time: burst
                .parse()
                .map_err(|_| invalid("burst time is not a positive integer"))?,
            priority: match priority {
                Some(p) if !p.is_empty() => {
                    p.parse().map_err(|_| invalid("priority is not an integer"))?
                }
                _ => Process::DEFAULT_PRIORITY,
            },
        };
        spec.validate()?;
        Ok(spec)
    }
}
