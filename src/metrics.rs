use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::config::Rules;
use crate::model::{ProjectRecord, TargetKind};

/// Recursively sums file sizes under `path`.
///
/// Skip-set names are pruned below the target root (the root itself is
/// usually `node_modules`, which is in the skip-set), symlinks are never
/// followed, and unreadable entries are skipped. Checked against `cancel`
/// at every directory boundary; a cancelled walk returns the partial sum.
pub fn dir_size(path: &Path, rules: &Rules, cancel: &Arc<AtomicBool>) -> u64 {
    let mut total = 0u64;
    let mut walker = WalkDir::new(path).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        if entry.file_type().is_dir() {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let name = entry.file_name().to_string_lossy();
            if entry.depth() > 0 && (rules.is_skipped_name(&name) || rules.is_excluded(entry.path()))
            {
                walker.skip_current_dir();
            }
            continue;
        }

        if entry.file_type().is_file()
            && let Ok(metadata) = entry.metadata()
        {
            total = total.saturating_add(metadata.len());
        }
    }
    total
}

/// Most recent file modification time under `project`, excluding skip-set
/// subtrees. Falls back to the project directory's own mtime when the walk
/// finds no qualifying file.
pub fn last_activity(
    project: &Path,
    rules: &Rules,
    cancel: &Arc<AtomicBool>,
) -> Option<SystemTime> {
    let mut latest: Option<SystemTime> = None;
    let mut walker = WalkDir::new(project).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        if entry.file_type().is_dir() {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let name = entry.file_name().to_string_lossy();
            if entry.depth() > 0 && (rules.is_skipped_name(&name) || rules.is_excluded(entry.path()))
            {
                walker.skip_current_dir();
            }
            continue;
        }

        if entry.file_type().is_file()
            && let Ok(metadata) = entry.metadata()
            && let Ok(modified) = metadata.modified()
        {
            latest = Some(match latest {
                Some(current) if current >= modified => current,
                _ => modified,
            });
        }
    }

    latest.or_else(|| project.metadata().ok().and_then(|m| m.modified().ok()))
}

/// Builds the full record for a classified project directory.
pub fn collect(project: &Path, rules: &Rules, cancel: &Arc<AtomicBool>) -> ProjectRecord {
    let mut record = ProjectRecord::new(project.to_path_buf());

    let node_modules = project.join(TargetKind::NodeModules.dir_name());
    if is_real_dir(&node_modules) {
        record.node_modules_size = dir_size(&node_modules, rules, cancel);
    }

    let dist = project.join(TargetKind::Dist.dir_name());
    if is_real_dir(&dist) {
        record.dist_size = dir_size(&dist, rules, cancel);
    }

    record.last_active = last_activity(project, rules, cancel);
    record
}

/// True for a directory that is not itself a symlink. A symlinked
/// node_modules (pnpm-style layouts) must not be sized or removed through
/// the link.
fn is_real_dir(path: &Path) -> bool {
    std::fs::symlink_metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
