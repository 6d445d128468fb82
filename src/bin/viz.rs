//! Terminal driver for the steppable sorts.
//!
//! Usage:
//!   sort-viz                          # Merge sort on 50 random numbers
//!   sort-viz quick --mode colors      # Quick sort on 100 random colours
//!   sort-viz heap --step              # Start paused; Enter advances one step
//!   sort-viz --compare --mode words   # Time every algorithm on the same words
//!   sort-viz --list                   # List available algorithms
//!
//! While a run is on screen, commands are read from stdin one line at a
//! time (see `tui::CONTROLS_HELP`).

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use sort_stepper::config::VisualizerConfig;
use sort_stepper::data::{generate, Collection, DataMode};
use sort_stepper::history::JsonHistory;
use sort_stepper::pacing::{PaceClock, Pacing, SPEED_STEP};
use sort_stepper::registry::{build_registry, AlgorithmRegistry};
use sort_stepper::session::{SessionError, SessionState, SortSession, StepOutcome};
use sort_stepper::sorting::SortAlgorithm;
use sort_stepper::tui::{self, Command};
use sort_stepper::utils::memory::TrackingAllocator;

#[global_allocator]
static ALLOC: TrackingAllocator = TrackingAllocator::new();

/// Redraw interval in continuous mode
const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sorting algorithms in the terminal", long_about = None)]
struct Args {
    /// Algorithm id or name, e.g. "merge" or "Quick Sort"
    #[arg(default_value = "merge")]
    algorithm: String,

    /// Kind of data: colors, numbers, words or letters
    #[arg(short, long, default_value = "numbers")]
    mode: DataMode,

    /// Number of items (default depends on the mode)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Speed slider position in [0, 1], 0 being the fastest
    #[arg(long, conflicts_with = "delay_ms")]
    speed: Option<f64>,

    /// Delay between steps in milliseconds
    #[arg(long)]
    delay_ms: Option<f64>,

    /// Start paused: every Enter advances one step
    #[arg(long)]
    step: bool,

    /// List available algorithms
    #[arg(short, long)]
    list: bool,

    /// Run every algorithm on the same data and print a timing table
    #[arg(long)]
    compare: bool,

    #[arg(long)]
    history_dir: Option<PathBuf>,

    /// Do not write run records to disk
    #[arg(long)]
    no_history: bool,

    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::builder().filter_level(log_level).init();

    let registry = build_registry();
    if args.list {
        tui::print_available_algorithms(&registry);
        return Ok(());
    }

    let mut config = VisualizerConfig::default();
    if let Some(count) = args.count {
        config.set_count(args.mode, count);
    }
    if let Some(dir) = &args.history_dir {
        config.history_dir = dir.clone();
    }
    let mut pacing = pacing_from_args(&args, &config)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let data = generate::generate(args.mode, config.count_for(args.mode), &mut rng);
    debug!("Generated {} {}", data.len(), data.mode());

    let mut session = SortSession::new().with_preview_len(config.preview_len);
    if !args.no_history {
        let history = JsonHistory::create(config.history_dir.clone())
            .with_context(|| format!("Cannot create history directory {:?}", config.history_dir))?
            .with_summary_file(config.summary_file.clone());
        session = session.with_history(history);
    }

    if args.compare {
        return run_comparison(&mut session, &registry, &data, &config);
    }

    let algorithm = registry.find(&args.algorithm).with_context(|| {
        format!(
            "Algorithm '{}' not found. Available: {}",
            args.algorithm,
            registry.list_ids().join(", ")
        )
    })?;
    if !start_or_notice(&mut session, algorithm, &data)? {
        return Ok(());
    }

    let commands = spawn_command_reader()?;
    run_interactive(&mut session, &registry, &mut pacing, &commands, args.step);

    if session.state() == SessionState::Finished {
        if let (Some(algorithm), Some(record)) = (session.algorithm(), session.last_record()) {
            tui::print_algo_info_box(algorithm.as_ref());
            println!("{}", tui::format_record(record));
        }
    }
    Ok(())
}

fn pacing_from_args(args: &Args, config: &VisualizerConfig) -> Result<Pacing> {
    let mut pacing = config.pacing().context("Bad pacing bounds")?;
    if let Some(ratio) = args.speed {
        pacing.set_ratio(ratio);
    }
    if let Some(ms) = args.delay_ms {
        pacing.set_delay_ms(ms);
    }
    Ok(pacing)
}

/// Start `algorithm`, or explain why there is nothing to show. Returns
/// whether a run was started.
fn start_or_notice(
    session: &mut SortSession,
    algorithm: Arc<dyn SortAlgorithm>,
    data: &Collection,
) -> Result<bool> {
    match session.start(algorithm, data) {
        Ok(()) => Ok(true),
        Err(SessionError::EmptyInput) => {
            println!("Nothing to sort: no {} were generated.", data.mode());
            Ok(false)
        }
        Err(e) => Err(e).context("Cannot start the sort"),
    }
}

/// Forward stdin lines to the driver loop from a background thread
fn spawn_command_reader() -> Result<Receiver<String>> {
    let (sender, receiver) = crossbeam_channel::unbounded();
    thread::Builder::new()
        .name("stdin-commands".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if sender.send(line).is_err() {
                    break;
                }
            }
            debug!("stdin closed");
        })
        .context("Cannot spawn the stdin reader")?;
    Ok(receiver)
}

fn draw(session: &SortSession, pacing: &Pacing, paused: bool) {
    let Some(mode) = session.mode() else {
        return;
    };
    let mut status = tui::format_status(
        session.algorithm().map(|a| a.name()),
        session.steps(),
        session.elapsed(),
        pacing,
    );
    if paused {
        status.push_str(" | paused");
    }
    tui::draw_frame(&session.current(), mode, &status);
    println!("{}", tui::CONTROLS_HELP);
}

/// Pull one step; false once the run has ended or faulted
fn advance(session: &mut SortSession) -> bool {
    match session.advance_one() {
        Ok(StepOutcome::Continuing) => true,
        Ok(_) => false,
        Err(e) => {
            eprintln!("Sort stopped: {}", e);
            false
        }
    }
}

/// Start the next algorithm of the catalogue on the same data
fn switch_to_next(session: &mut SortSession, registry: &AlgorithmRegistry) {
    let next = session
        .algorithm()
        .and_then(|current| registry.all().iter().position(|a| a.id() == current.id()))
        .map_or(0, |i| i + 1);
    if let (Some(algorithm), Some(data)) = (registry.cycle(next), session.original().cloned()) {
        info!("Switching to {}", algorithm.name());
        if let Err(e) = session.start(algorithm, &data) {
            warn!("Cannot switch algorithm: {}", e);
        }
    }
}

/// Show the run until it ends or the user quits. The pacing clock drives
/// steps while not paused; stdin commands can pause, step, change speed,
/// restart or switch algorithm at any point.
fn run_interactive(
    session: &mut SortSession,
    registry: &AlgorithmRegistry,
    pacing: &mut Pacing,
    commands: &Receiver<String>,
    start_paused: bool,
) {
    let mut paused = start_paused;
    let mut input_open = true;
    let mut clock = PaceClock::new(Instant::now());
    draw(session, pacing, paused);

    while session.is_running() {
        let wait = FRAME.min(pacing.delay());
        let command = if input_open {
            match commands.recv_timeout(wait) {
                Ok(line) => Command::parse(&line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    input_open = false;
                    None
                }
            }
        } else {
            thread::sleep(wait);
            None
        };
        if !input_open && paused {
            // Nobody left to press Enter
            paused = false;
            clock.reset(Instant::now());
        }

        match command {
            Some(Command::Quit) => {
                session.stop();
                break;
            }
            Some(Command::Step) => {
                paused = true;
                advance(session);
            }
            Some(Command::TogglePause) => {
                paused = !paused;
                clock.reset(Instant::now());
            }
            Some(Command::Faster) => pacing.nudge(-SPEED_STEP),
            Some(Command::Slower) => pacing.nudge(SPEED_STEP),
            Some(Command::Restart) => {
                if let Err(e) = session.restart() {
                    warn!("Cannot restart: {}", e);
                }
                clock.reset(Instant::now());
            }
            Some(Command::NextAlgorithm) => {
                switch_to_next(session, registry);
                clock.reset(Instant::now());
            }
            None => {}
        }

        if !paused {
            for _ in 0..clock.due_steps(pacing, Instant::now()) {
                if !advance(session) {
                    break;
                }
            }
        }
        draw(session, pacing, paused);
    }
}

/// Run every algorithm headless on `data` and print the timing table
fn run_comparison(
    session: &mut SortSession,
    registry: &AlgorithmRegistry,
    data: &Collection,
    config: &VisualizerConfig,
) -> Result<()> {
    if data.is_empty() {
        println!("Nothing to compare: no {} were generated.", data.mode());
        return Ok(());
    }
    tui::print_header();
    let runs = config.compare_runs.max(1);
    info!(
        "Comparing {} algorithms on {} {} ({} runs each)",
        registry.len(),
        data.len(),
        data.mode(),
        runs
    );

    for algorithm in registry.all() {
        for _ in 0..runs {
            if !start_or_notice(session, Arc::clone(algorithm), data)? {
                break;
            }
            while advance(session) {}
        }
    }

    tui::print_comparison(&session.comparison(), data.mode(), data.len());
    Ok(())
}
