use std::path::PathBuf;
use std::time::SystemTime;

use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cleaner::{Cleaner, CleanupMode, CleanupMsg, CleanupTarget, trash_available};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{ProjectSet, TargetKind, TargetStatus};
use crate::utils::{display_path, format_bytes, resolve_root};

use super::scan::run_scan;

pub struct CleanOptions {
    pub root: Option<PathBuf>,
    pub min_days: u64,
    pub all: bool,
    pub permanent: bool,
    pub assume_yes: bool,
    pub verbose: bool,
}

pub fn execute_clean(options: CleanOptions) -> Result<(), AppError> {
    let config = Config::load()?;
    let rules = config.compile()?.shared();
    let root = resolve_root(options.root.clone());

    let mut set = run_scan(root, rules, options.verbose)?;
    let now = SystemTime::now();

    if options.all {
        set.select_all();
    } else {
        set.select_inactive_only(options.min_days, now);
    }

    let targets = plan_targets(&set);
    if targets.is_empty() {
        println!("Nothing to clean. No selected project has node_modules or dist.");
        return Ok(());
    }

    // Capability detection happens before anything is touched so the
    // confirmation can say what will actually happen to the files.
    let mode = if options.permanent {
        CleanupMode::Permanent
    } else if trash_available() {
        CleanupMode::Trash
    } else {
        println!(
            "The system trash is not available here, and falling back to permanent \
             deletion requires explicit consent. Re-run with --permanent to delete \
             irreversibly. Nothing was removed."
        );
        return Ok(());
    };

    let estimate = set.estimate_selected();
    print_plan(&set, &targets, estimate, options.verbose);

    if !options.assume_yes && !confirm(mode, targets.len(), estimate)? {
        println!("Aborted. Nothing was removed.");
        return Ok(());
    }

    let bar = ProgressBar::new(targets.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let run = Cleaner::new(mode).spawn(targets);
    let mut failures = Vec::new();
    let mut summary = None;
    for msg in run.messages() {
        match msg {
            CleanupMsg::Deleting { project, kind } => {
                bar.set_message(format!("{} · {}", display_path(&project), kind.dir_name()));
            }
            CleanupMsg::Result(result) => {
                bar.inc(1);
                match &result.status {
                    TargetStatus::Failed(reason) => {
                        failures.push(format!(
                            "{} · {}: {}",
                            display_path(&result.project),
                            result.kind.dir_name(),
                            reason
                        ));
                    }
                    TargetStatus::Succeeded | TargetStatus::Skipped => {
                        // The executor reports results; the record collection
                        // is refreshed here, on the foreground.
                        set.mark_cleaned(&result.project, result.kind);
                    }
                }
            }
            CleanupMsg::Done(done) => {
                summary = Some(done);
                break;
            }
        }
    }
    run.join();
    bar.finish_and_clear();

    for failure in &failures {
        eprintln!("Failed: {failure}");
    }
    if let Some(summary) = summary {
        println!(
            "Cleaned {} of {} target(s), reclaimed about {}.{}",
            summary.succeeded,
            summary.succeeded + summary.failed,
            format_bytes(summary.reclaimed),
            if mode == CleanupMode::Trash { " Items were moved to the trash." } else { "" },
        );
    }

    Ok(())
}

/// Targets for every selected project: each artifact the scan measured as
/// non-empty, plus any that exists on disk right now. A directory that
/// vanished since the scan stays in the plan and resolves as a no-op
/// success.
fn plan_targets(set: &ProjectSet) -> Vec<CleanupTarget> {
    let mut targets = Vec::new();
    for record in set.selected() {
        for kind in TargetKind::ALL {
            let expected_bytes = match kind {
                TargetKind::NodeModules => record.node_modules_size,
                TargetKind::Dist => record.dist_size,
            };
            if expected_bytes > 0 || record.path.join(kind.dir_name()).is_dir() {
                targets.push(CleanupTarget { project: record.path.clone(), kind, expected_bytes });
            }
        }
    }
    targets
}

fn print_plan(set: &ProjectSet, targets: &[CleanupTarget], estimate: u64, verbose: bool) {
    println!(
        "Cleanup plan: {} target(s) across {} selected project(s), about {} reclaimable.",
        targets.len(),
        set.selected().len(),
        format_bytes(estimate)
    );
    if verbose {
        for target in targets {
            println!(
                "    • {:<60} {}",
                format!("{}/{}", display_path(&target.project), target.kind.dir_name()),
                format_bytes(target.expected_bytes)
            );
        }
    }
}

fn confirm(mode: CleanupMode, count: usize, estimate: u64) -> Result<bool, AppError> {
    let prompt = match mode {
        CleanupMode::Trash => format!(
            "Move {} director(ies) to the trash (recoverable), reclaiming about {}?",
            count,
            format_bytes(estimate)
        ),
        CleanupMode::Permanent => format!(
            "PERMANENTLY delete {} director(ies), reclaiming about {}? This cannot be undone.",
            count,
            format_bytes(estimate)
        ),
    };
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
