use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use vuesweep::commands::clean::CleanOptions;
use vuesweep::commands::config_cmd::ConfigOptions;
use vuesweep::commands::scan::{ScanOptions, SortKey};
use vuesweep::commands::{execute_clean, execute_config, execute_scan};
use vuesweep::error::AppError;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => {
            let options = ScanOptions {
                root: args.path,
                min_days: args.days,
                show_all: args.all,
                sort: args.sort,
                verbose: args.verbose,
            };
            execute_scan(options)?;
        }
        Commands::Clean(args) => {
            let options = CleanOptions {
                root: args.path,
                min_days: args.days,
                all: args.all,
                permanent: args.permanent,
                assume_yes: args.yes,
                verbose: args.verbose,
            };
            execute_clean(options)?;
        }
        Commands::Config(args) => {
            let options = ConfigOptions {
                show_path: args.path,
                edit: args.edit,
                add_exclude: args.add_exclude,
            };
            execute_config(options)?;
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "vuesweep",
    version,
    about = "Reclaim disk space from inactive Vue projects by clearing node_modules and dist."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for Vue projects and report reclaimable space (read-only).
    Scan(ScanArgs),
    /// Remove node_modules and dist from inactive Vue projects.
    Clean(CleanArgs),
    /// Manage vuesweep configuration (skip-set, signatures, exclusions).
    Config(ConfigArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Root directory to scan (defaults to the home directory).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Inactivity threshold in days.
    #[arg(short = 'd', long = "days", value_name = "DAYS", default_value_t = 30)]
    days: u64,

    /// List every project, not just those past the inactivity threshold.
    #[arg(long = "all", action = ArgAction::SetTrue)]
    all: bool,

    /// Order the table by days, size or path.
    #[arg(long = "sort", value_name = "KEY", default_value = "days")]
    sort: SortKey,

    /// Report directories skipped due to errors.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Args)]
struct CleanArgs {
    /// Root directory to scan (defaults to the home directory).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Inactivity threshold in days.
    #[arg(short = 'd', long = "days", value_name = "DAYS", default_value_t = 30)]
    days: u64,

    /// Clean every discovered project, ignoring the inactivity threshold.
    #[arg(long = "all", action = ArgAction::SetTrue)]
    all: bool,

    /// Delete permanently instead of moving to the trash. Irreversible.
    #[arg(long = "permanent", action = ArgAction::SetTrue)]
    permanent: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    yes: bool,

    /// Show each planned target and report skipped directories.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Show the configuration file path.
    #[arg(long = "path", action = ArgAction::SetTrue)]
    path: bool,

    /// Open the configuration file in $EDITOR.
    #[arg(long = "edit", action = ArgAction::SetTrue)]
    edit: bool,

    /// Add an exclude glob (applied to traversal and size computation).
    #[arg(long = "add-exclude", value_name = "PATTERN")]
    add_exclude: Option<String>,
}
