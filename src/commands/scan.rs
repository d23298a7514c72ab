use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{Config, Rules};
use crate::error::AppError;
use crate::model::{ProjectRecord, ProjectSet};
use crate::session::{ScanMsg, ScanSession};
use crate::utils::{display_path, format_bytes, resolve_root};

/// Column the result table is ordered by. `Days` is the canonical display
/// order (inactivity, then reclaimable size, then path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Days,
    Size,
    Path,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "days" => Ok(SortKey::Days),
            "size" => Ok(SortKey::Size),
            "path" => Ok(SortKey::Path),
            other => Err(format!("Unknown sort key '{other}' (expected days, size or path)")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Days => write!(f, "days"),
            SortKey::Size => write!(f, "size"),
            SortKey::Path => write!(f, "path"),
        }
    }
}

pub struct ScanOptions {
    pub root: Option<PathBuf>,
    pub min_days: u64,
    pub show_all: bool,
    pub sort: SortKey,
    pub verbose: bool,
}

/// Runs a full scan session to completion, draining worker messages into a
/// foreground-owned `ProjectSet`. Shared by `scan` and `clean`.
pub fn run_scan(
    root: PathBuf,
    rules: Arc<Rules>,
    verbose: bool,
) -> Result<ProjectSet, AppError> {
    let session = ScanSession::start(root, rules, verbose)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Scanning…");

    let mut set = ProjectSet::new();
    for msg in session.messages() {
        if !session.accepts(&msg) {
            continue;
        }
        match msg {
            ScanMsg::Project { record, .. } => {
                set.insert(record);
                spinner.set_message(format!("Found {} Vue project(s)…", set.len()));
                spinner.tick();
            }
            ScanMsg::Done { cancelled, .. } => {
                if cancelled {
                    spinner.finish_with_message(format!(
                        "Scan cancelled; {} Vue project(s) found",
                        set.len()
                    ));
                } else {
                    spinner.finish_with_message(format!("Found {} Vue project(s)", set.len()));
                }
                break;
            }
        }
    }
    session.join();
    Ok(set)
}

pub fn execute_scan(options: ScanOptions) -> Result<ProjectSet, AppError> {
    let config = Config::load()?;
    let rules = config.compile()?.shared();
    let root = resolve_root(options.root.clone());

    let set = run_scan(root, rules, options.verbose)?;
    print_report(&set, &options);
    Ok(set)
}

fn print_report(set: &ProjectSet, options: &ScanOptions) {
    let now = SystemTime::now();

    let mut rows: Vec<&ProjectRecord> = if options.show_all {
        set.iter().collect()
    } else {
        set.filter_inactive(options.min_days, now)
    };

    match options.sort {
        SortKey::Days => {
            rows.sort_by(|a, b| {
                b.inactive_days(now)
                    .cmp(&a.inactive_days(now))
                    .then_with(|| b.reclaimable_bytes().cmp(&a.reclaimable_bytes()))
                    .then_with(|| a.path.cmp(&b.path))
            });
        }
        SortKey::Size => {
            rows.sort_by(|a, b| {
                b.reclaimable_bytes().cmp(&a.reclaimable_bytes()).then_with(|| a.path.cmp(&b.path))
            });
        }
        SortKey::Path => rows.sort_by(|a, b| a.path.cmp(&b.path)),
    }

    if rows.is_empty() {
        if options.show_all {
            println!("No Vue projects found.");
        } else {
            println!(
                "No Vue projects inactive for {} day(s) or more (use --all to list every project).",
                options.min_days
            );
        }
        return;
    }

    println!("{:>6}  {:>12}  {:>12}  {:>12}  project", "days", "node_modules", "dist", "total");
    let mut shown_total = 0u64;
    for record in &rows {
        shown_total = shown_total.saturating_add(record.reclaimable_bytes());
        println!(
            "{:>6}  {:>12}  {:>12}  {:>12}  {}",
            record.inactive_days(now),
            format_bytes(record.node_modules_size),
            format_bytes(record.dist_size),
            format_bytes(record.reclaimable_bytes()),
            display_path(&record.path),
        );
    }
    println!("Total reclaimable: {} across {} project(s)", format_bytes(shown_total), rows.len());
}
