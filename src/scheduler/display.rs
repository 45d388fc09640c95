use super::{runner::RunnerEvent, ProcessStatus, SchedulingEngine};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

const TICK_RATE: Duration = Duration::from_millis(200);

const HELP: &str = "enter: start | p: pause | r: resume | s: step | x: reset | q: quit";

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new() -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Set up the input handling thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = TICK_RATE
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                return;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => return,
                }

                if last_tick.elapsed() >= TICK_RATE {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        // Set up the terminal-user-interface
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw(&mut self, engine: &SchedulingEngine) -> Result<(), io::Error> {
        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(5),
                    Constraint::Length(8),
                ])
                .split(f.size());

            let state = if engine.is_complete() && engine.clock() > 0 {
                "completed"
            } else if engine.is_paused() {
                "paused"
            } else if engine.is_running() {
                "running"
            } else {
                "stopped"
            };
            let current = Paragraph::new(match engine.current_process() {
                Some(process) => format!(
                    "t={} | {} | {} | {} left | {}",
                    engine.clock(),
                    process.pid(),
                    process.name(),
                    process.remaining_burst_time(),
                    state
                ),
                None => format!("t={} | No task is currently running. | {}", engine.clock(), state),
            })
            .style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::LightBlue),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Current Task")
                    .border_type(BorderType::Rounded),
            );

            f.render_widget(current, chunks[0]);

            let rows = engine.processes().iter().map(|process| {
                let time = |value: Option<u32>| value.map_or_else(|| "-".to_owned(), |t| t.to_string());
                Row::new(vec![
                    Cell::from(process.pid().to_string())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(process.name().to_owned()),
                    Cell::from(process.arrival_time().to_string()),
                    Cell::from(format!(
                        "{}/{}",
                        process.remaining_burst_time(),
                        process.burst_time()
                    )),
                    Cell::from(process.priority().to_string()),
                    Cell::from(process.status().to_string())
                        .style(Style::default().fg(status_color(process.status()))),
                    Cell::from(time(process.completion_time())),
                    Cell::from(time(process.turnaround_time())),
                    Cell::from(time(process.waiting_time())),
                    Cell::from(time(process.response_time())),
                ])
            });

            let title = format!("{} (quantum {})", engine.algorithm().name(), engine.time_quantum());
            let table = Table::new(rows)
                .header(
                    Row::new(vec![
                        "PID", "Name", "Arrival", "Burst", "Priority", "Status", "Done", "Turn",
                        "Wait", "Resp",
                    ])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(3),
                    Constraint::Length(12),
                    Constraint::Length(7),
                    Constraint::Length(7),
                    Constraint::Length(8),
                    Constraint::Length(9),
                    Constraint::Length(5),
                    Constraint::Length(5),
                    Constraint::Length(5),
                    Constraint::Length(5),
                ])
                .block(Block::default().title(title).borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);

            f.render_widget(table, chunks[1]);

            let slices: Vec<Span> = engine
                .gantt()
                .merged()
                .iter()
                .map(|slice| {
                    let style = if slice.is_idle() {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::Yellow)
                    };
                    Span::styled(format!("{slice} "), style)
                })
                .collect();
            let gantt = Paragraph::new(Spans::from(slices))
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Gantt").borders(Borders::ALL));

            f.render_widget(gantt, chunks[2]);

            let statistics = match engine.statistics() {
                Some(statistics) => statistics.to_string(),
                None => "No process has completed yet.".to_owned(),
            };
            let statistics = Paragraph::new(statistics).block(
                Block::default()
                    .title(format!("Statistics | {HELP}"))
                    .borders(Borders::ALL),
            );

            f.render_widget(statistics, chunks[3]);
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // Get the user's input and return a matching event
        match self.input_rx.recv() {
            Ok(DisplayEvent::Input(key)) => {
                if key.modifiers.is_empty() {
                    match key.code {
                        KeyCode::Char('q') => return RunnerEvent::Quit,
                        KeyCode::Char('p') => return RunnerEvent::Pause,
                        KeyCode::Char('r') => return RunnerEvent::Resume,
                        KeyCode::Char('s') => return RunnerEvent::Step,
                        KeyCode::Char('x') => return RunnerEvent::Reset,
                        KeyCode::Enter => return RunnerEvent::Start,
                        _ => {}
                    };
                }
            }
            Ok(DisplayEvent::Tick) => {}
            // The input thread is gone, nothing can be read anymore
            Err(_) => return RunnerEvent::Quit,
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = self.terminal.show_cursor();
    }
}

fn status_color(status: ProcessStatus) -> Color {
    match status {
        ProcessStatus::Ready => Color::Gray,
        ProcessStatus::Waiting => Color::Yellow,
        ProcessStatus::Running => Color::LightBlue,
        ProcessStatus::Completed => Color::LightGreen,
    }
}
