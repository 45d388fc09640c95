use super::{
    algorithm::Algorithm,
    error::{Result, SchedulerError},
    gantt::GanttRecord,
    process::{Process, ProcessSpec, ProcessStatus},
    ready_queue::ReadyQueue,
    stats::Statistics,
};
use log::{debug, info};

/// Discrete-time simulation of a single CPU.
///
/// Nothing happens on its own: every call to [`SchedulingEngine::step`]
/// advances the clock by one decision (a single tick, or a whole time
/// quantum under round robin). Processes are referred to by their index in
/// [`SchedulingEngine::processes`].
#[derive(Debug, Clone)]
pub struct SchedulingEngine {
    processes: Vec<Process>,
    ready_queue: ReadyQueue,
    completed: Vec<usize>,
    gantt: GanttRecord,
    clock: u32,
    algorithm: Algorithm,
    time_quantum: u32,
    current_process: Option<usize>,
    next_pid: usize,
    running: bool,
    paused: bool,
}

impl SchedulingEngine {
    pub const DEFAULT_TIME_QUANTUM: u32 = 2;

    pub fn new() -> Self {
        SchedulingEngine::with_algorithm(Algorithm::default())
    }

    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self {
            processes: Vec::new(),
            ready_queue: ReadyQueue::new(),
            completed: Vec::new(),
            gantt: GanttRecord::new(),
            clock: 0,
            algorithm,
            time_quantum: SchedulingEngine::DEFAULT_TIME_QUANTUM,
            current_process: None,
            next_pid: 0,
            running: false,
            paused: false,
        }
    }

    pub fn with_processes(
        specs: impl IntoIterator<Item = ProcessSpec>,
        algorithm: Algorithm,
    ) -> Result<Self> {
        let mut engine = SchedulingEngine::with_algorithm(algorithm);
        for spec in specs {
            engine.add_spec(spec)?;
        }
        Ok(engine)
    }

    /// Appends a new process and returns its index.
    pub fn add_process(
        &mut self,
        name: &str,
        arrival_time: u32,
        burst_time: u32,
        priority: i32,
    ) -> Result<usize> {
        self.add_spec(ProcessSpec {
            name: name.trim().to_owned(),
            arrival_time,
            burst_time,
            priority,
        })
    }

    pub fn add_spec(&mut self, spec: ProcessSpec) -> Result<usize> {
        spec.validate()?;

        let process = Process::with_priority(
            self.next_pid,
            spec.name.trim(),
            spec.arrival_time,
            spec.burst_time,
            spec.priority,
        );
        self.next_pid += 1;
        debug!(
            "added {} (arrival {}, burst {}, priority {})",
            process.name(),
            process.arrival_time(),
            process.burst_time(),
            process.priority()
        );
        self.processes.push(process);
        Ok(self.processes.len() - 1)
    }

    pub fn remove_process(&mut self, index: usize) -> Result<Process> {
        if index >= self.processes.len() {
            return Err(SchedulerError::IndexOutOfRange {
                index,
                len: self.processes.len(),
            });
        }

        let process = self.processes.remove(index);
        self.ready_queue.forget(index);
        self.completed.retain(|&handle| handle != index);
        for handle in self.completed.iter_mut() {
            if *handle > index {
                *handle -= 1;
            }
        }
        self.current_process = match self.current_process {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            current => current,
        };
        debug!("removed {}", process.name());
        Ok(process)
    }

    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn set_time_quantum(&mut self, time_quantum: u32) -> Result<()> {
        if time_quantum == 0 {
            return Err(SchedulerError::InvalidInput(
                "time quantum must be positive".to_owned(),
            ));
        }
        self.time_quantum = time_quantum;
        Ok(())
    }

    /// Resets the simulation and marks it as running.
    pub fn start(&mut self) -> Result<()> {
        if self.processes.is_empty() {
            return Err(SchedulerError::NoProcesses);
        }

        self.reset();
        self.running = true;
        info!(
            "Started {} with {} processes",
            self.algorithm.name(),
            self.processes.len()
        );
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    /// Puts every process back into its initial state and rewinds the clock.
    pub fn reset(&mut self) {
        for process in self.processes.iter_mut() {
            process.reset();
        }
        self.ready_queue.clear();
        self.completed.clear();
        self.gantt.clear();
        self.clock = 0;
        self.current_process = None;
        self.running = false;
        self.paused = false;
        debug!("Simulation reset");
    }

    /// Executes one scheduling decision. Returns true once every process has
    /// completed, in which case further steps do nothing.
    pub fn step(&mut self) -> bool {
        if self.is_complete() {
            self.stop();
            return true;
        }

        self.admit_arrivals();
        let elapsed = match self.pick_next() {
            Some(index) => self.execute(index),
            None => {
                self.current_process = None;
                self.gantt.record(None, self.clock);
                debug!("idle at {}", self.clock);
                1
            }
        };
        self.clock += elapsed;

        let complete = self.is_complete();
        if complete {
            info!("All processes completed at {}", self.clock);
            self.stop();
        }
        complete
    }

    /// Steps until every process completes or `max_steps` steps have run.
    pub fn run_to_completion(&mut self, max_steps: usize) -> bool {
        for _ in 0..max_steps {
            if self.step() {
                return true;
            }
        }
        self.is_complete()
    }

    fn admit_arrivals(&mut self) {
        for (index, process) in self.processes.iter_mut().enumerate() {
            // A round robin burst can skip past an arrival tick; such
            // processes join at the next step.
            if process.status() == ProcessStatus::Ready && process.arrival_time() <= self.clock {
                process.admit();
                self.ready_queue.enqueue(index);
                debug!("{} arrived at {}", process.name(), self.clock);
            }
        }
    }

    fn pick_next(&mut self) -> Option<usize> {
        if self.ready_queue.is_empty() {
            return None;
        }
        if self.algorithm.is_fifo() {
            return self.ready_queue.dequeue_front();
        }

        let mut slots: Vec<Option<&mut Process>> = self.processes.iter_mut().map(Some).collect();
        let mut candidates: Vec<&mut Process> = self
            .ready_queue
            .peek_all()
            .filter_map(|handle| slots.get_mut(handle).and_then(Option::take))
            .collect();
        debug_assert_eq!(candidates.len(), self.ready_queue.len());

        let position = self.algorithm.select(&mut candidates, self.clock);
        self.ready_queue.remove_at(position)
    }

    /// Runs the process at `index` and returns the ticks it used.
    fn execute(&mut self, index: usize) -> u32 {
        let start = self.clock;
        let process = &mut self.processes[index];
        let ticks = if self.algorithm.uses_time_quantum() {
            self.time_quantum.min(process.remaining_burst_time())
        } else {
            1
        };

        process.dispatch(start);
        for tick in start..start + ticks {
            self.gantt.record(Some(process.name()), tick);
        }

        let end = start + ticks;
        if process.execute(ticks, end) {
            debug!(
                "{} ran [{}, {}) and completed (turnaround {}, waiting {})",
                process.name(),
                start,
                end,
                process.turnaround_time().unwrap_or_default(),
                process.waiting_time().unwrap_or_default()
            );
            self.completed.push(index);
        } else {
            debug!(
                "{} ran [{}, {}), {} left",
                process.name(),
                start,
                end,
                process.remaining_burst_time()
            );
            if self.algorithm.keeps_cpu_until_done() {
                self.ready_queue.enqueue_front(index);
            } else {
                self.ready_queue.enqueue(index);
            }
        }
        self.current_process = Some(index);
        ticks
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, index: usize) -> Option<&Process> {
        self.processes.get(index)
    }

    /// The process that ran during the last step, if any.
    pub fn current_process(&self) -> Option<&Process> {
        self.current_process
            .and_then(|index| self.processes.get(index))
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready_queue
    }

    /// Queued processes in ready-queue order.
    pub fn queued(&self) -> impl Iterator<Item = &Process> + '_ {
        self.ready_queue
            .peek_all()
            .filter_map(|index| self.processes.get(index))
    }

    /// Completed processes in completion order.
    pub fn completed(&self) -> impl Iterator<Item = &Process> + '_ {
        self.completed
            .iter()
            .filter_map(|&index| self.processes.get(index))
    }

    pub fn gantt(&self) -> &GanttRecord {
        &self.gantt
    }

    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn time_quantum(&self) -> u32 {
        self.time_quantum
    }

    pub fn statistics(&self) -> Option<Statistics> {
        Statistics::collect(self.completed(), self.clock)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == self.processes.len()
    }
}

impl Default for SchedulingEngine {
    fn default() -> Self {
        Self::new()
    }
}
