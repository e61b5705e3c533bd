#[macro_use]
extern crate slog_logger;
extern crate slog_scope;
extern crate slog_stdlog;

use std::env;
use std::error::Error;

use clap::{Parser, Subcommand, ValueEnum};
use partitioner::{PartitionConfig, Partitioner, Pool, WorkerCommand, DEFAULT_WORKERS};

#[derive(Parser, Debug)]
#[command(name = "mountain")]
#[command(author, version, about = "Find the peak of mountain-shaped arrays, sequentially and in parallel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time sequential and concurrent searches over generated mountains
    Run(RunArgs),

    /// Serve one process-pool work item over stdin/stdout
    #[command(hide = true)]
    Worker,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Array sizes; each peaks at 50.23% of its length
    #[arg(long, value_delimiter = ',', default_values_t = [10_000usize, 100_000, 1_000_000, 10_000_000])]
    sizes: Vec<usize>,

    /// Worker counts to try [default: 1 and the number of physical cores]
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    workers: Vec<i64>,

    /// Calls per measurement
    #[arg(short = 'n', long, default_value = "10")]
    repeat: u32,

    /// Which worker pools to measure
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Threads,
    Processes,
    Both,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let args = match cli.command {
        // Keep stdout clean for the reply frame: no logger in workers.
        Some(Command::Worker) => {
            partitioner::worker::serve_stdio()?;
            return Ok(());
        }
        Some(Command::Run(args)) => args,
        None => RunArgs::parse_from(["run"]),
    };

    let logger = slog_logger::initlogger(false, "", 0, true, false);
    let _guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init()?;

    run(args)
}

fn peak_for(size: usize) -> usize {
    (size as u64 * 5023 / 10000) as usize
}

fn pools(mode: Mode, worker: &WorkerCommand) -> Vec<Pool> {
    match mode {
        Mode::Threads => vec![Pool::Threads],
        Mode::Processes => vec![Pool::Processes(worker.clone())],
        Mode::Both => vec![Pool::Threads, Pool::Processes(worker.clone())],
    }
}

fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let tests: Vec<Vec<i32>> = args
        .sizes
        .iter()
        .map(|&size| instrument::generate_mountain(size, peak_for(size)))
        .collect();
    info!("Generated {} mountains, {} calls per measurement", tests.len(), args.repeat);

    for heights in &tests {
        let (mut search, captured) = instrument::capture(|| peakfinder::find_max_in(heights));
        let elapsed = instrument::time_repeated(args.repeat, || {
            if let Ok(_) = search() {}
        });
        let ans = captured.last().transpose()?;
        println!(
            "{}",
            instrument::report_line(elapsed, "not threaded", heights.len(), answer(ans))
        );
    }

    let workers = if args.workers.is_empty() {
        vec![1, *DEFAULT_WORKERS as i64]
    } else {
        args.workers.clone()
    };
    WorkerCommand::new(env::current_exe()?).arg("worker").register();
    let worker = WorkerCommand::locate()?;

    for &count in &workers {
        for pool in pools(args.mode, &worker) {
            let label = format!("{} {}", count, pool.name());
            let partitioner = Partitioner::new(PartitionConfig::new(count, pool));
            for heights in &tests {
                let (mut search, captured) = instrument::capture(|| {
                    partitioner.find_max(heights).map_err(|err| err.to_string())
                });
                let elapsed = instrument::time_repeated(args.repeat, || {
                    if let Ok(_) = search() {}
                });
                let ans = captured.last().transpose()?;
                println!(
                    "{}",
                    instrument::report_line(elapsed, &label, heights.len(), answer(ans))
                );
            }
        }
    }
    Ok(())
}

fn answer(ans: Option<i32>) -> String {
    ans.map_or_else(|| "none".to_owned(), |value| value.to_string())
}
