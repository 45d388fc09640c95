use super::process::Process;
use serde::Serialize;
use std::fmt;

/// Aggregate figures over the completed processes of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    pub average_response_time: f64,
    /// Percentage of elapsed ticks spent on completed work.
    pub cpu_utilization: f64,
    /// Completed processes per tick.
    pub throughput: f64,
    pub total_time: u32,
    pub completed: usize,
}

impl Statistics {
    /// `None` until the clock has moved and at least one process completed.
    pub fn collect<'a>(completed: impl IntoIterator<Item = &'a Process>, clock: u32) -> Option<Self> {
        if clock == 0 {
            return None;
        }

        let mut count = 0usize;
        let mut waiting = 0u64;
        let mut turnaround = 0u64;
        let mut response = 0u64;
        let mut busy = 0u64;
        for process in completed {
            count += 1;
            waiting += u64::from(process.waiting_time().unwrap_or_default());
            turnaround += u64::from(process.turnaround_time().unwrap_or_default());
            response += u64::from(process.response_time().unwrap_or_default());
            busy += u64::from(process.burst_time());
        }
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let elapsed = f64::from(clock);
        Some(Self {
            average_waiting_time: waiting as f64 / n,
            average_turnaround_time: turnaround as f64 / n,
            average_response_time: response as f64 / n,
            cpu_utilization: busy as f64 / elapsed * 100.0,
            throughput: n / elapsed,
            total_time: clock,
            completed: count,
        })
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average waiting time:    {:.2}", self.average_waiting_time)?;
        writeln!(f, "Average turnaround time: {:.2}", self.average_turnaround_time)?;
        writeln!(f, "Average response time:   {:.2}", self.average_response_time)?;
        writeln!(f, "CPU utilization:         {:.2}%", self.cpu_utilization)?;
        writeln!(f, "Throughput:              {:.2}", self.throughput)?;
        write!(f, "Total time:              {}", self.total_time)
    }
}
