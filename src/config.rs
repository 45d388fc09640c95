use crate::scheduler::{self, Algorithm, ProcessSpec, SchedulingEngine};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, time::Duration};

/// A set of processes plus the settings to simulate them with.
///
/// ```json
/// { "algorithm": "rr", "time_quantum": 2,
///   "processes": [{ "name": "P1", "arrival_time": 0, "burst_time": 4 }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workload {
    #[serde(default)]
    pub algorithm: Option<Algorithm>,
    #[serde(default)]
    pub time_quantum: Option<u32>,
    #[serde(default)]
    pub tick_rate_ms: Option<u64>,
    #[serde(default)]
    pub processes: Vec<ProcessSpec>,
}

impl Workload {
    /// Parses inline JSON, or reads it from a file when `input` is prefixed
    /// with `f:` or `file:`.
    pub fn parse(input: &str) -> Result<Self> {
        let workload = match input
            .strip_prefix("file:")
            .or_else(|| input.strip_prefix("f:"))
        {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read workload file {path}"))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse workload file {path}"))?
            }
            None => serde_json::from_str(input).context("Failed to parse workload")?,
        };
        Ok(workload)
    }

    /// The five processes the simulator starts out with when given nothing
    /// else.
    pub fn sample() -> Self {
        let process = |name: &str, arrival_time, burst_time, priority| ProcessSpec {
            name: name.to_owned(),
            arrival_time,
            burst_time,
            priority,
        };

        Self {
            processes: vec![
                process("P1", 0, 4, 2),
                process("P2", 1, 3, 1),
                process("P3", 2, 1, 3),
                process("P4", 3, 5, 2),
                process("P5", 4, 2, 1),
            ],
            ..Self::default()
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate_ms
            .map_or(scheduler::DEFAULT_TICK_RATE, Duration::from_millis)
    }

    /// Builds an engine loaded with these processes and settings.
    pub fn build_engine(&self) -> scheduler::Result<SchedulingEngine> {
        let mut engine = SchedulingEngine::with_processes(
            self.processes.iter().cloned(),
            self.algorithm.unwrap_or_default(),
        )?;
        if let Some(time_quantum) = self.time_quantum {
            engine.set_time_quantum(time_quantum)?;
        }
        Ok(engine)
    }
}
