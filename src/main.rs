use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use log::info;
use std::{fs::File, io, path::PathBuf, time::Duration};
use tick_scheduler::{Algorithm, ProcessRunner, ProcessSpec, SchedulingEngine, Workload};

/// Discrete-time simulator of CPU scheduling algorithms.
///
/// Without a workload or processes the five sample processes P1..P5 are
/// simulated.
#[derive(Debug, Parser)]
#[clap(name = "tick-scheduler", version)]
struct Opts {
    /// Workload JSON, inline or as a path prefixed with "f:" or "file:".
    #[clap(short = 'w', long)]
    workload: Option<String>,

    /// Extra process as name:arrival:burst[:priority]. Repeatable.
    #[clap(short = 'p', long = "process")]
    processes: Vec<ProcessSpec>,

    /// Scheduling algorithm: fcfs, sjf, srtf, rr, priority,
    /// priority-preemptive, hrrn, multilevel or multilevel-feedback.
    #[clap(short = 'a', long)]
    algorithm: Option<Algorithm>,

    /// Round robin time quantum.
    #[clap(short = 'q', long)]
    time_quantum: Option<u32>,

    /// Milliseconds between two steps in interactive mode.
    #[clap(short = 't', long)]
    tick_rate: Option<u64>,

    /// Run to completion without the terminal interface and print a report.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    headless: bool,

    /// Upper bound on the number of steps in headless mode.
    #[clap(long, default_value = "100000")]
    max_steps: usize,

    /// Log file for interactive mode, where stderr is taken by the interface.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose output, including per-tick scheduling decisions.
    /// Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(opts: &Opts) -> Result<()> {
    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);

    if opts.headless {
        simplelog::TermLogger::init(
            llv,
            lcfg.build(),
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        )?;
    } else if let Some(path) = &opts.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        simplelog::WriteLogger::init(llv, lcfg.build(), file)?;
    }
    Ok(())
}

fn load_workload(opts: &Opts) -> Result<Workload> {
    let mut workload = match &opts.workload {
        Some(input) => Workload::parse(input)?,
        None if opts.processes.is_empty() => Workload::sample(),
        None => Workload::default(),
    };

    workload.processes.extend(opts.processes.iter().cloned());
    if opts.algorithm.is_some() {
        workload.algorithm = opts.algorithm;
    }
    if opts.time_quantum.is_some() {
        workload.time_quantum = opts.time_quantum;
    }
    if opts.tick_rate.is_some() {
        workload.tick_rate_ms = opts.tick_rate;
    }
    Ok(workload)
}

fn print_report(engine: &SchedulingEngine) {
    println!("{} (quantum {})", engine.algorithm().name(), engine.time_quantum());
    println!();

    let gantt: Vec<String> = engine
        .gantt()
        .merged()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Gantt: {}", gantt.join(" "));
    println!();

    println!(
        "{:<12} {:>7} {:>5} {:>8} {:>10} {:>10} {:>7} {:>8}",
        "Name", "Arrival", "Burst", "Priority", "Completion", "Turnaround", "Waiting", "Response"
    );
    for process in engine.completed() {
        println!(
            "{:<12} {:>7} {:>5} {:>8} {:>10} {:>10} {:>7} {:>8}",
            process.name(),
            process.arrival_time(),
            process.burst_time(),
            process.original_priority(),
            process.completion_time().unwrap_or_default(),
            process.turnaround_time().unwrap_or_default(),
            process.waiting_time().unwrap_or_default(),
            process.response_time().unwrap_or_default(),
        );
    }
    println!();

    match engine.statistics() {
        Some(statistics) => println!("{statistics}"),
        None => println!("No process has completed."),
    }
}

fn run_headless(mut engine: SchedulingEngine, max_steps: usize) -> Result<()> {
    engine.start()?;
    if !engine.run_to_completion(max_steps) {
        anyhow::bail!("Simulation did not complete within {max_steps} steps");
    }
    print_report(&engine);
    Ok(())
}

fn run_interactive(engine: SchedulingEngine, tick_rate: Duration) -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut runner =
        ProcessRunner::new(engine, tick_rate).context("Failed to set up the terminal")?;
    while runner.run()? {}
    let engine = runner.into_engine();

    execute!(io::stdout(), Clear(ClearType::All))?;
    if engine.clock() > 0 {
        print_report(&engine);
    }
    Ok(())
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(&opts)?;

    let workload = load_workload(&opts)?;
    let engine = workload
        .build_engine()
        .context("Invalid workload")?;
    info!(
        "Loaded {} processes for {}",
        engine.processes().len(),
        engine.algorithm().name()
    );

    if opts.headless {
        run_headless(engine, opts.max_steps)
    } else {
        run_interactive(engine, workload.tick_rate())
    }
}
