//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "turngate", version, about = "Turngate release-timing CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/turngate.toml")]
    pub config: PathBuf,

    /// Optional model calibration CSV (strict header), overriding the
    /// config's inline model
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the release rig (simulated turntable unless built with the
    /// hardware feature)
    Run {
        /// Stop after this many control-loop ticks (default: run until ctrl-c)
        #[arg(long)]
        ticks: Option<u64>,

        /// Simulated turntable period in µs (simulation builds only)
        #[arg(long, default_value_t = 600_000)]
        sim_period_us: u64,

        /// Enable SCHED_FIFO and memory locking (Linux only)
        #[arg(long, action = ArgAction::SetTrue)]
        rt: bool,

        /// Real-time priority to request with --rt (default: min+10)
        #[arg(long)]
        rt_prio: Option<i32>,
    },
    /// Validate the config (and the model CSV when given), then exit
    CheckConfig,
    /// One-shot release-time query against the configured model, for
    /// calibration checks
    Predict {
        /// Duration of the last completed turn (µs)
        #[arg(long)]
        last_turn_us: u64,

        /// Time already spent in the current turn (µs)
        #[arg(long, default_value_t = 0)]
        time_in_round_us: u64,
    },
}
