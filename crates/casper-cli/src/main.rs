//! CASPER CLI - incremental multi-shot solving over temporal observations.
//!
//! Reports are printed to stdout as JSON unless `--output` is given; logs go
//! to stderr.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use casper_ops::{Config, IncrementalRequest, MetaEventRequest, OpsContext, WitnessMode};

mod commands;

use commands::{config as config_cmd, incremental, meta, prep};

/// CASPER: incremental solving and meta-event recomputation.
#[derive(Parser, Debug)]
#[command(
    name = "casper",
    author,
    version,
    about = "CASPER: incremental clingo solving and meta-event recomputation",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a facts program step by step in one multi-shot session.
    ///
    /// The `#program step(<label>).` headers of the facts file define the
    /// steps, in declaration order.
    Incremental {
        /// Facts program whose step headers define the plan.
        #[arg(long)]
        facts: PathBuf,

        /// Files for the base section.
        #[arg(long, num_args = 1.., required = true)]
        base: Vec<PathBuf>,

        /// Files for the step section.
        #[arg(long, num_args = 1.., required = true)]
        step: Vec<PathBuf>,

        /// Files for the optional check section.
        #[arg(long, num_args = 1..)]
        check: Vec<PathBuf>,

        /// Write the report to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Witness layout: merged or per-model.
        #[arg(long, default_value_t = WitnessMode::Merged)]
        witnesses: WitnessMode,

        /// Raw solver arguments (must come last), e.g. --clingo-args --models=0.
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        clingo_args: Option<Vec<String>>,
    },

    /// Recompute meta-events for every witness of a report.
    MetaEvents {
        /// Base rule files, space-separated.
        base_files: String,

        /// Rules deriving meta-events from a witness's facts.
        meta_event: PathBuf,

        /// Report produced by an earlier run.
        repair_json: PathBuf,

        /// Number of solver processes run in parallel.
        #[arg(long)]
        threads: Option<usize>,

        /// Time unit passed to the rules as the `unit` constant.
        #[arg(long)]
        unit: Option<String>,

        /// Per-subprocess timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Write the report to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Prepare rule and fact files for solving.
    #[command(subcommand)]
    Prep(PrepCommands),

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Preparation subcommands. An output of `-` writes to stdout.
#[derive(Subcommand, Debug)]
enum PrepCommands {
    /// Group obs(..., T) facts into #program step(t<T>) sections.
    Observations {
        input: PathBuf,
        output: PathBuf,

        /// Keep timestamps in order of appearance instead of sorting them.
        #[arg(long)]
        preserve_order: bool,
    },

    /// Keep observations whose timestamp lies in [start, end].
    #[command(allow_negative_numbers = true)]
    Filter {
        input: PathBuf,
        output: PathBuf,
        start: i64,
        end: i64,
    },

    /// Put atemporal facts under #program base.
    Atemporal { input: PathBuf, output: PathBuf },

    /// Move simple-event rules into the guarded step(t) section.
    SimpleEvents { input: PathBuf, output: PathBuf },

    /// Move meta-event rules into the guarded check(t) section.
    MetaEvents { input: PathBuf, output: PathBuf },

    /// Emit guard facts for every step, for one-shot solving.
    Activation { facts: PathBuf, output: PathBuf },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv();
    let config = Config::load()?;

    match cli.command {
        Commands::Incremental {
            facts,
            base,
            step,
            check,
            output,
            witnesses,
            clingo_args,
        } => {
            let mut request = IncrementalRequest::new(facts, base, step)
                .with_check(check)
                .with_witness_mode(witnesses);
            if let Some(args) = clingo_args {
                request = request.with_clingo_args(args);
            }
            let ctx = OpsContext::new(config);
            incremental::execute(&ctx, &request, output.as_deref(), cli.quiet)?;
        }

        Commands::MetaEvents {
            base_files,
            meta_event,
            repair_json,
            threads,
            unit,
            timeout,
            output,
        } => {
            let base_files = base_files.split_whitespace().map(PathBuf::from).collect();
            let mut request = MetaEventRequest::new(base_files, meta_event, repair_json);
            request.threads = threads;
            request.unit = unit;
            request.timeout = timeout.map(Duration::from_secs);
            let ctx = OpsContext::new(config);
            meta::execute(&ctx, &request, output.as_deref(), cli.quiet).await?;
        }

        Commands::Prep(prep_cmd) => match prep_cmd {
            PrepCommands::Observations {
                input,
                output,
                preserve_order,
            } => prep::observations(&input, &output, preserve_order)?,
            PrepCommands::Filter {
                input,
                output,
                start,
                end,
            } => prep::filter(&input, &output, start, end)?,
            PrepCommands::Atemporal { input, output } => prep::atemporal(&input, &output)?,
            PrepCommands::SimpleEvents { input, output } => {
                prep::simple_events(&input, &output)?
            }
            PrepCommands::MetaEvents { input, output } => prep::meta_events(&input, &output)?,
            PrepCommands::Activation { facts, output } => prep::activation(&facts, &output)?,
        },

        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => {
                    config_cmd::show(&config)?;
                }
                ConfigCommands::Set { key, value } => {
                    config_cmd::set(&mut config, &key, &value)?;
                }
                ConfigCommands::Get { key } => {
                    config_cmd::get(&config, &key)?;
                }
                ConfigCommands::Reset => {
                    config_cmd::reset()?;
                }
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
        }
    }

    Ok(())
}
