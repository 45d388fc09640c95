use super::{
    error::{Result, SchedulerError},
    process::Process,
};
use log::trace;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Picks which of the queued `candidates` (in ready-queue order, never
/// empty) runs next at `clock`, returning its position among them.
pub type Selector = fn(candidates: &mut [&mut Process], clock: u32) -> usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    Fcfs,
    Sjf,
    Srtf,
    #[serde(rename = "rr")]
    RoundRobin,
    Priority,
    PriorityPreemptive,
    Hrrn,
    Multilevel,
    MultilevelFeedback,
}

struct AlgorithmEntry {
    algorithm: Algorithm,
    id: &'static str,
    name: &'static str,
    selector: Selector,
}

// Indexed by discriminant.
static ALGORITHMS: [AlgorithmEntry; 9] = [
    AlgorithmEntry {
        algorithm: Algorithm::Fcfs,
        id: "fcfs",
        name: "First Come First Served",
        selector: front,
    },
    AlgorithmEntry {
        algorithm: Algorithm::Sjf,
        id: "sjf",
        name: "Shortest Job First",
        selector: shortest_remaining,
    },
    AlgorithmEntry {
        algorithm: Algorithm::Srtf,
        id: "srtf",
        name: "Shortest Remaining Time First",
        selector: shortest_remaining,
    },
    AlgorithmEntry {
        algorithm: Algorithm::RoundRobin,
        id: "rr",
        name: "Round Robin",
        selector: front,
    },
    AlgorithmEntry {
        algorithm: Algorithm::Priority,
        id: "priority",
        name: "Priority",
        selector: highest_priority,
    },
    AlgorithmEntry {
        algorithm: Algorithm::PriorityPreemptive,
        id: "priority-preemptive",
        name: "Priority (Preemptive)",
        selector: highest_priority,
    },
    AlgorithmEntry {
        algorithm: Algorithm::Hrrn,
        id: "hrrn",
        name: "Highest Response Ratio Next",
        selector: highest_response_ratio,
    },
    AlgorithmEntry {
        algorithm: Algorithm::Multilevel,
        id: "multilevel",
        name: "Multilevel Queue",
        selector: foreground_first,
    },
    AlgorithmEntry {
        algorithm: Algorithm::MultilevelFeedback,
        id: "multilevel-feedback",
        name: "Multilevel Feedback Queue",
        selector: aged_highest_priority,
    },
];

impl Algorithm {
    /// Processes at or below this priority value form the foreground band
    /// of the multilevel queue.
    pub const FOREGROUND_PRIORITY: i32 = 5;
    /// Ticks since arrival after which the feedback queue ages a process.
    pub const AGING_THRESHOLD: u32 = 10;
    /// Aging never raises a process above this priority value.
    pub const AGING_FLOOR: i32 = 1;

    pub const ALL: [Algorithm; 9] = [
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::Srtf,
        Algorithm::RoundRobin,
        Algorithm::Priority,
        Algorithm::PriorityPreemptive,
        Algorithm::Hrrn,
        Algorithm::Multilevel,
        Algorithm::MultilevelFeedback,
    ];

    fn entry(self) -> &'static AlgorithmEntry {
        &ALGORITHMS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.entry().id
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn selector(self) -> Selector {
        self.entry().selector
    }

    /// Whether a selected process keeps the CPU for a whole time quantum
    /// instead of a single tick.
    pub fn uses_time_quantum(self) -> bool {
        self == Algorithm::RoundRobin
    }

    /// Whether an unfinished process goes back to the head of the ready
    /// queue, so that nothing queued behind it can run first.
    pub fn keeps_cpu_until_done(self) -> bool {
        self == Algorithm::Fcfs
    }

    /// Whether the selector always takes the head of the ready queue.
    pub fn is_fifo(self) -> bool {
        matches!(self, Algorithm::Fcfs | Algorithm::RoundRobin)
    }

    /// Runs this algorithm's selector over `candidates`.
    pub fn select(self, candidates: &mut [&mut Process], clock: u32) -> usize {
        let position = (self.selector())(candidates, clock);
        trace!(
            "{} picked {} at {} out of {} queued",
            self.id(),
            candidates[position].name(),
            clock,
            candidates.len()
        );
        position
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        ALGORITHMS
            .iter()
            .find(|entry| entry.id.eq_ignore_ascii_case(s.trim()))
            .map(|entry| entry.algorithm)
            .ok_or_else(|| {
                let ids: Vec<&str> = ALGORITHMS.iter().map(|entry| entry.id).collect();
                SchedulerError::InvalidInput(format!(
                    "unknown algorithm {s:?}, expected one of {}",
                    ids.join(", ")
                ))
            })
    }
}

fn front(_candidates: &mut [&mut Process], _clock: u32) -> usize {
    0
}

fn shortest_remaining(candidates: &mut [&mut Process], _clock: u32) -> usize {
    first_min_by_key(candidates, |process| process.remaining_burst_time())
}

fn highest_priority(candidates: &mut [&mut Process], _clock: u32) -> usize {
    first_min_by_key(candidates, |process| process.priority())
}

fn highest_response_ratio(candidates: &mut [&mut Process], clock: u32) -> usize {
    let mut best = 0;
    let mut best_ratio = f64::MIN;
    for (position, process) in candidates.iter().enumerate() {
        let ratio = process.response_ratio(clock);
        if ratio > best_ratio {
            best = position;
            best_ratio = ratio;
        }
    }
    best
}

fn foreground_first(candidates: &mut [&mut Process], _clock: u32) -> usize {
    candidates
        .iter()
        .position(|process| process.priority() <= Algorithm::FOREGROUND_PRIORITY)
        .unwrap_or(0)
}

fn aged_highest_priority(candidates: &mut [&mut Process], clock: u32) -> usize {
    for process in candidates.iter_mut() {
        if process.time_since_arrival(clock) > Algorithm::AGING_THRESHOLD
            && process.priority() > Algorithm::AGING_FLOOR
        {
            process.age();
            trace!("aged {} to priority {}", process.name(), process.priority());
        }
    }
    highest_priority(candidates, clock)
}

// `Iterator::min_by` keeps the first of equal minimums.
fn first_min_by_key<K: Ord>(candidates: &[&mut Process], key: impl Fn(&Process) -> K) -> usize {
    candidates
        .iter()
        .map(|process| key(&**process))
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(position, _)| position)
}
