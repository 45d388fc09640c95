use tick_scheduler::{Algorithm, Process, ProcessStatus, SchedulingEngine, Workload};

fn engine(algorithm: Algorithm, processes: &[(&str, u32, u32, i32)]) -> SchedulingEngine {
    let mut engine = SchedulingEngine::with_algorithm(algorithm);
    for &(name, arrival, burst, priority) in processes {
        engine.add_process(name, arrival, burst, priority).unwrap();
    }
    engine
}

/// The process that held the CPU during each tick.
fn timeline(engine: &SchedulingEngine) -> Vec<String> {
    engine
        .gantt()
        .entries()
        .iter()
        .map(|entry| entry.process.clone().unwrap_or_else(|| "idle".to_owned()))
        .collect()
}

fn completion(engine: &SchedulingEngine, name: &str) -> (u32, u32, u32, u32) {
    let process = engine
        .processes()
        .iter()
        .find(|process| process.name() == name)
        .unwrap();
    (
        process.completion_time().unwrap(),
        process.turnaround_time().unwrap(),
        process.waiting_time().unwrap(),
        process.response_time().unwrap(),
    )
}

fn assert_consistent(engine: &SchedulingEngine) {
    let mut expected_start = 0;
    for entry in engine.gantt().entries() {
        assert_eq!(entry.start, expected_start, "gap or overlap at {entry}");
        assert!(entry.end > entry.start);
        expected_start = entry.end;
    }
    assert_eq!(expected_start, engine.clock());
    assert_eq!(
        engine
            .gantt()
            .entries()
            .iter()
            .map(|entry| entry.duration())
            .sum::<u32>(),
        engine.clock()
    );

    for process in engine.processes() {
        assert!(process.remaining_burst_time() <= process.burst_time());
        if process.is_completed() {
            assert_eq!(process.remaining_burst_time(), 0);
            assert_eq!(
                process.turnaround_time(),
                Some(process.completion_time().unwrap() - process.arrival_time())
            );
            assert_eq!(
                process.waiting_time(),
                Some(process.turnaround_time().unwrap() - process.burst_time())
            );
            let ran = engine
                .gantt()
                .entries()
                .iter()
                .filter(|entry| entry.process.as_deref() == Some(process.name()))
                .count() as u32;
            assert_eq!(ran, process.burst_time());
        }
    }

    let queued: Vec<&Process> = engine.queued().collect();
    for process in engine.processes() {
        let occurrences = queued.iter().filter(|queued| queued.pid() == process.pid()).count();
        if process.status() == ProcessStatus::Waiting {
            assert_eq!(occurrences, 1, "{} must be queued once", process.name());
        } else {
            assert_eq!(occurrences, 0, "{} must not be queued", process.name());
        }
    }
}

#[test]
fn fcfs_runs_each_process_to_completion() {
    let mut engine = engine(Algorithm::Fcfs, &[("P1", 0, 4, 5), ("P2", 1, 3, 5)]);
    engine.start().unwrap();
    assert!(engine.run_to_completion(100));

    assert_eq!(timeline(&engine), vec!["P1", "P1", "P1", "P1", "P2", "P2", "P2"]);
    assert_eq!(completion(&engine, "P1"), (4, 4, 0, 0));
    assert_eq!(completion(&engine, "P2"), (7, 6, 3, 3));
    assert_eq!(engine.clock(), 7);
    assert_consistent(&engine);
}

#[test]
fn shortest_remaining_preempts_at_tick_granularity() {
    let processes = [("P1", 0, 4, 5), ("P2", 1, 3, 5), ("P3", 2, 1, 5)];
    for algorithm in [Algorithm::Sjf, Algorithm::Srtf] {
        let mut engine = engine(algorithm, &processes);
        assert!(engine.run_to_completion(100));

        assert_eq!(
            timeline(&engine),
            vec!["P1", "P1", "P3", "P1", "P1", "P2", "P2", "P2"],
            "{algorithm}"
        );
        assert_eq!(completion(&engine, "P3"), (3, 1, 0, 0));
        assert_eq!(completion(&engine, "P1"), (5, 5, 1, 0));
        assert_eq!(completion(&engine, "P2"), (8, 7, 4, 4));
        assert_consistent(&engine);
    }
}

#[test]
fn round_robin_runs_whole_quanta() {
    let mut engine = engine(Algorithm::RoundRobin, &[("P1", 0, 4, 5), ("P2", 0, 3, 5)]);
    engine.set_time_quantum(2).unwrap();

    let mut clocks = Vec::new();
    while !engine.step() {
        clocks.push(engine.clock());
    }
    clocks.push(engine.clock());

    assert_eq!(clocks, vec![2, 4, 6, 7]);
    assert_eq!(timeline(&engine), vec!["P1", "P1", "P2", "P2", "P1", "P1", "P2"]);
    let merged: Vec<String> = engine.gantt().merged().iter().map(ToString::to_string).collect();
    assert_eq!(merged, vec!["P1[0,2)", "P2[2,4)", "P1[4,6)", "P2[6,7)"]);
    assert_eq!(completion(&engine, "P1"), (6, 6, 2, 0));
    assert_eq!(completion(&engine, "P2"), (7, 7, 4, 2));
    assert_consistent(&engine);
}

#[test]
fn round_robin_admits_skipped_arrivals_after_the_burst() {
    let mut engine = engine(Algorithm::RoundRobin, &[("P1", 0, 4, 5), ("P2", 1, 2, 5)]);
    engine.set_time_quantum(3).unwrap();

    assert!(!engine.step());
    assert_eq!(engine.clock(), 3);
    // P2 arrived during the burst but is only queued at the next step.
    assert_eq!(engine.processes()[1].status(), ProcessStatus::Ready);
    assert_eq!(engine.queued().map(Process::name).collect::<Vec<_>>(), vec!["P1"]);

    assert!(engine.run_to_completion(10));
    assert_eq!(timeline(&engine), vec!["P1", "P1", "P1", "P1", "P2", "P2"]);
    assert_eq!(completion(&engine, "P2"), (6, 5, 3, 3));
    assert_consistent(&engine);
}

#[test]
fn priority_variants_behave_identically() {
    let sample = Workload::sample();
    let expected = vec![
        "P1", "P2", "P2", "P2", "P5", "P5", "P1", "P4", "P1", "P4", "P1", "P4", "P4", "P4", "P3",
    ];

    for algorithm in [Algorithm::Priority, Algorithm::PriorityPreemptive] {
        let mut engine = sample.build_engine().unwrap();
        engine.select_algorithm(algorithm);
        assert!(engine.run_to_completion(100));

        assert_eq!(timeline(&engine), expected, "{algorithm}");
        assert_eq!(completion(&engine, "P2").0, 4);
        assert_eq!(completion(&engine, "P5").0, 6);
        assert_eq!(completion(&engine, "P1").0, 11);
        assert_eq!(completion(&engine, "P4").0, 14);
        assert_eq!(completion(&engine, "P3").0, 15);
        assert_eq!(
            engine.completed().map(Process::name).collect::<Vec<_>>(),
            vec!["P2", "P5", "P1", "P4", "P3"]
        );
        assert_consistent(&engine);
    }
}

#[test]
fn hrrn_favors_short_waiting_jobs() {
    let mut engine = engine(
        Algorithm::Hrrn,
        &[("P1", 0, 3, 5), ("P2", 1, 5, 5), ("P3", 2, 2, 5)],
    );
    assert!(engine.run_to_completion(100));

    assert_eq!(
        timeline(&engine),
        vec!["P1", "P1", "P1", "P3", "P3", "P2", "P2", "P2", "P2", "P2"]
    );
    assert_eq!(completion(&engine, "P3"), (5, 3, 1, 1));
    assert_consistent(&engine);
}

#[test]
fn multilevel_queue_runs_foreground_first() {
    let mut engine = engine(Algorithm::Multilevel, &[("P1", 0, 3, 8), ("P2", 1, 2, 3)]);
    assert!(engine.run_to_completion(100));

    assert_eq!(timeline(&engine), vec!["P1", "P2", "P2", "P1", "P1"]);
    assert_eq!(completion(&engine, "P2"), (3, 2, 0, 0));
    assert_eq!(completion(&engine, "P1"), (5, 5, 2, 0));
    assert_consistent(&engine);
}

#[test]
fn feedback_queue_ages_starving_processes() {
    let processes = [("L", 0, 3, 4), ("H", 0, 20, 2)];

    let mut plain = engine(Algorithm::Priority, &processes);
    assert!(plain.run_to_completion(100));
    assert_eq!(completion(&plain, "H").0, 20);
    assert_eq!(completion(&plain, "L").0, 23);

    let mut aging = engine(Algorithm::MultilevelFeedback, &processes);
    assert!(aging.run_to_completion(100));
    assert_eq!(completion(&aging, "L").0, 18);
    assert_eq!(completion(&aging, "H").0, 23);
    assert_eq!(&timeline(&aging)[10..18], ["H", "H", "H", "L", "H", "L", "H", "L"]);
    assert_eq!(aging.processes()[0].priority(), 1);
    assert_eq!(aging.processes()[1].priority(), 1);
    assert_consistent(&aging);

    aging.reset();
    assert_eq!(aging.processes()[0].priority(), 4);
    assert_eq!(aging.processes()[1].priority(), 2);
}

#[test]
fn every_algorithm_completes_consistently() {
    let mut workload = Workload::sample();
    workload.processes.push(tick_scheduler::ProcessSpec {
        name: "Late".to_owned(),
        arrival_time: 30,
        burst_time: 3,
        priority: 9,
    });

    for algorithm in Algorithm::ALL {
        let mut engine = workload.build_engine().unwrap();
        engine.select_algorithm(algorithm);
        engine.start().unwrap();
        assert!(engine.run_to_completion(1000), "{algorithm} did not finish");

        assert!(engine
            .processes()
            .iter()
            .all(|process| process.status() == ProcessStatus::Completed));
        assert!(engine.ready_queue().is_empty());
        assert!(!engine.is_running());
        assert_eq!(engine.completed().count(), 6);
        // The CPU idles until the late process arrives.
        assert!(engine.gantt().entries().iter().any(|entry| entry.is_idle()));
        assert_consistent(&engine);
    }
}

#[test]
fn reset_reproduces_the_same_run() {
    for algorithm in Algorithm::ALL {
        let mut engine = Workload::sample().build_engine().unwrap();
        engine.select_algorithm(algorithm);
        engine.set_time_quantum(3).unwrap();
        let pristine: Vec<Process> = engine.processes().to_vec();

        engine.start().unwrap();
        assert!(engine.run_to_completion(1000));
        let first = engine.gantt().clone();
        let first_stats = engine.statistics();

        engine.reset();
        assert_eq!(engine.clock(), 0);
        assert!(engine.gantt().is_empty());
        assert_eq!(engine.completed().count(), 0);
        assert!(engine.ready_queue().is_empty());
        assert_eq!(engine.processes(), pristine.as_slice());
        assert_eq!(engine.statistics(), None);

        engine.start().unwrap();
        assert!(engine.run_to_completion(1000));
        assert_eq!(engine.gantt(), &first, "{algorithm}");
        assert_eq!(engine.statistics(), first_stats);
    }
}

#[test]
fn statistics_follow_completed_processes() {
    let mut engine = engine(Algorithm::Fcfs, &[("P1", 0, 4, 5), ("P2", 1, 3, 5)]);
    assert_eq!(engine.statistics(), None);

    for _ in 0..3 {
        engine.step();
    }
    // Time has passed but nothing has completed.
    assert_eq!(engine.statistics(), None);

    assert!(engine.run_to_completion(100));
    let statistics = engine.statistics().unwrap();
    assert_eq!(statistics.average_waiting_time, 1.5);
    assert_eq!(statistics.average_turnaround_time, 5.0);
    assert_eq!(statistics.average_response_time, 1.5);
    assert_eq!(statistics.cpu_utilization, 100.0);
    assert_eq!(statistics.throughput, 2.0 / 7.0);
    assert_eq!(statistics.total_time, 7);
    assert_eq!(statistics.completed, 2);
}

#[test]
fn utilization_accounts_for_idle_time() {
    let mut engine = engine(Algorithm::Fcfs, &[("P1", 2, 2, 5)]);
    assert!(engine.run_to_completion(10));

    let statistics = engine.statistics().unwrap();
    assert_eq!(statistics.total_time, 4);
    assert_eq!(statistics.cpu_utilization, 50.0);
    assert_eq!(statistics.average_waiting_time, 0.0);
}
