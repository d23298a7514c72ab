use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use walkdir::WalkDir;

use crate::classify::is_vue_project;
use crate::config::Rules;
use crate::metrics;
use crate::model::ProjectRecord;

/// Walks a root directory and hands every classified Vue project, with its
/// metrics, to the caller as it is discovered.
pub struct Scanner {
    rules: Arc<Rules>,
    cancel: Arc<AtomicBool>,
    verbose: bool,
}

impl Scanner {
    pub fn new(rules: Arc<Rules>, cancel: Arc<AtomicBool>, verbose: bool) -> Self {
        Self { rules, cancel, verbose }
    }

    /// Runs the walk → classify → measure pipeline.
    ///
    /// Skip-set directories and exclude-glob matches are never descended
    /// into; symlinks are never followed; unreadable directories are skipped
    /// and the walk continues with their siblings. The cancel flag is
    /// checked at every directory boundary, so a cancelled scan stops early
    /// while everything already sent stays valid.
    ///
    /// Returns the number of projects discovered. `emit` hands each record
    /// to the caller; returning false means the receiving side is gone and
    /// ends the walk quietly.
    pub fn scan<F>(&self, root: &Path, mut emit: F) -> usize
    where
        F: FnMut(ProjectRecord) -> bool,
    {
        let mut found = 0usize;
        let mut walker = WalkDir::new(root).into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if self.verbose {
                        eprintln!("Skipping {:?}: {}", err.path(), err);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if self.cancel.load(Ordering::Relaxed) {
                break;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            if entry.depth() > 0 && (self.rules.is_skipped_name(&name) || self.rules.is_excluded(path))
            {
                walker.skip_current_dir();
                continue;
            }

            // Nested projects are discovered as the walk reaches their own
            // directories, so classification never recurses here.
            if path.join("package.json").is_file() && is_vue_project(path, &self.rules) {
                let record = metrics::collect(path, &self.rules, &self.cancel);
                found += 1;
                if !emit(record) {
                    break;
                }
            }
        }
        found
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}
