//! MMU Simulator - Main Entry Point
//!
//! Replays a trace of alloc/write/read/free operations against a simulated
//! paging MMU and prints one result line per operation.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use mmu_sim::io::{read_trace, replay, write_results, TraceError};
use mmu_sim::{Mmu, MmuConfig, MmuError, DEFAULT_FRAME_SIZE, DEFAULT_MEM_SIZE};

/// Command-line configuration
#[derive(Debug, Parser)]
#[command(name = "mmu-sim", about = "Replay memory operations against a simulated paging MMU")]
struct Config {
    /// Physical memory size in bytes
    #[arg(long, default_value_t = DEFAULT_MEM_SIZE)]
    mem_size: usize,

    /// Frame (and page) size in bytes, a power of two
    #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
    frame_size: usize,

    /// Log every operation and a frame summary
    #[arg(short, long)]
    verbose: bool,

    /// Trace file with one operation per line
    trace_file: PathBuf,

    /// Where to write results; stdout when omitted
    output_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error(transparent)]
    Mmu(#[from] MmuError),
}

fn main() {
    let config = Config::parse();

    let default_level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    // Run the simulator and handle any errors
    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main logic separated from main() for cleaner error handling
fn run(config: &Config) -> Result<(), RunError> {
    let mut mmu = Mmu::with_config(MmuConfig::new(config.mem_size, config.frame_size))?;
    let ops = read_trace(&config.trace_file)?;
    info!(
        "replaying {} operations from {}",
        ops.len(),
        config.trace_file.display()
    );

    let results = replay(&mut mmu, &ops);

    let stats = mmu.stats();
    info!(
        "frames: {} total, {} used, {} free across {} processes",
        stats.total_frames, stats.used_frames, stats.free_frames, stats.processes
    );
    mmu.check_invariants()?;

    match &config.output_file {
        Some(path) => write_results(path, &results)?,
        None => {
            for line in &results {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
