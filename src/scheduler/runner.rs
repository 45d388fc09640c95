use std::{
    io,
    time::{Duration, Instant},
};

use log::{info, warn};

use super::{display::DisplayTerminal, SchedulingEngine};

pub enum RunnerEvent {
    Quit,
    Start,
    Pause,
    Resume,
    Step,
    Reset,
    None,
}

/// Paces an engine on the wall clock and renders it in the terminal.
pub struct ProcessRunner {
    terminal: DisplayTerminal,
    engine: SchedulingEngine,
    tick_rate: Duration,
    last_step: Instant,
}

impl ProcessRunner {
    pub fn new(engine: SchedulingEngine, tick_rate: Duration) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new()?;

        Ok(Self {
            terminal,
            engine,
            tick_rate,
            last_step: Instant::now(),
        })
    }

    pub fn engine(&self) -> &SchedulingEngine {
        &self.engine
    }

    pub fn into_engine(self) -> SchedulingEngine {
        self.engine
    }

    fn start(&mut self) {
        match self.engine.start() {
            Ok(()) => self.last_step = Instant::now(),
            Err(err) => warn!("Cannot start: {err}"),
        }
    }

    fn run_step(&mut self) {
        self.last_step = Instant::now();
        let was_complete = self.engine.is_complete();
        if self.engine.step() && !was_complete {
            info!("Simulation completed");
        }
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        if self.engine.is_running()
            && !self.engine.is_paused()
            && self.last_step.elapsed() >= self.tick_rate
        {
            self.run_step();
        }
        self.terminal.draw(&self.engine)?;

        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            RunnerEvent::Start if !self.engine.is_running() => self.start(),
            RunnerEvent::Pause if self.engine.is_running() => self.engine.pause(),
            RunnerEvent::Resume if self.engine.is_paused() => self.engine.resume(),
            RunnerEvent::Step if !self.engine.is_running() || self.engine.is_paused() => {
                self.run_step();
            }
            RunnerEvent::Reset => self.engine.reset(),
            _ => {}
        }
        Ok(true)
    }
}
