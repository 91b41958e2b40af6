use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use simplelog::LevelFilter;
use status_analytics::processing::StatusType;
use status_analytics::table::Granularity;

#[derive(Parser)]
#[command(name = "status-analytics", version)]
#[command(about = "Count originals, reposts and replies in a status export and write the tables as JSON")]
pub struct Opts {
    /// Level of verbosity (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// TOML config file (column set, column roles, output directory, threshold, time step)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory the JSON results are written to (overrides the config)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,
    /// Also append load/export events to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every analysis and write one file per analysis
    All {
        /// The dataset path (.csv, .json or .ndjson)
        data: PathBuf,
    },
    /// Original/repost/reply counts per author, field value or time bucket
    Types {
        data: PathBuf,
        /// Field to group by (defaults to the author column)
        #[arg(long)]
        by: Option<String>,
        /// Time bucket size when grouping by a timestamp column (min, h, D, W, M, Y)
        #[arg(long)]
        step: Option<Granularity>,
    },
    /// Counts of one status type per group
    Relations {
        data: PathBuf,
        /// Status type to count (original, repost or reply)
        #[arg(long = "type")]
        status: StatusType,
        /// Field to group by (defaults to the timestamp column)
        #[arg(long)]
        by: Option<String>,
        /// Time bucket size when grouping by a timestamp column (min, h, D, W, M, Y)
        #[arg(long)]
        step: Option<Granularity>,
    },
    /// Value counts of one field, rare values merged into "others"
    Field {
        data: PathBuf,
        field: String,
        /// Values seen fewer times than this are merged (overrides the config)
        #[arg(long)]
        threshold: Option<u64>,
    },
    /// Counts of one entity field across all statuses (e.g. hashtags text)
    Entities {
        data: PathBuf,
        entity: String,
        field: String,
    },
    /// Replies per replied-to status
    Replies { data: PathBuf },
    /// Mentioned user ids per author
    Interactions { data: PathBuf },
}

fn select_log_level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    simplelog::TermLogger::init(
        select_log_level_filter(verbosity),
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
}
