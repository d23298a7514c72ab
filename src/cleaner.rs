use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, unbounded};
use dirs_next as dirs;

use crate::model::{CleanupSummary, TargetKind, TargetResult, TargetStatus};

/// How removed directories leave the filesystem. `Trash` is recoverable;
/// `Permanent` is irreversible and must only be chosen after the caller has
/// confirmed it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupMode {
    Trash,
    Permanent,
}

/// Runtime probe for the OS trash facility. The Presentation layer uses
/// this to pick its confirmation wording before any deletion starts.
///
/// Setting `VUESWEEP_NO_TRASH` (to anything but `0`) forces the capability
/// off, for environments where the probe is wrong — e.g. network mounts
/// with no reachable trash directory. Otherwise macOS and Windows always
/// expose a trash; on other Unixes the freedesktop trash lives under the
/// home directory, so one must resolve.
pub fn trash_available() -> bool {
    if let Some(flag) = std::env::var_os("VUESWEEP_NO_TRASH")
        && flag != "0"
    {
        return false;
    }
    if cfg!(target_os = "macos") || cfg!(windows) {
        return true;
    }
    dirs::home_dir().is_some()
}

/// One directory scheduled for removal. `expected_bytes` is the size the
/// scan measured, used for the reclaimed total in the summary.
#[derive(Debug, Clone)]
pub struct CleanupTarget {
    pub project: PathBuf,
    pub kind: TargetKind,
    pub expected_bytes: u64,
}

/// Progress stream of a cleanup batch: per target a `Deleting` marker, then
/// its terminal `Result`; one final `Done` with the aggregate summary.
#[derive(Debug)]
pub enum CleanupMsg {
    Deleting { project: PathBuf, kind: TargetKind },
    Result(TargetResult),
    Done(CleanupSummary),
}

pub struct Cleaner {
    mode: CleanupMode,
}

impl Cleaner {
    pub fn new(mode: CleanupMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CleanupMode {
        self.mode
    }

    /// Runs the batch on a background worker, streaming progress messages.
    /// One failed target never aborts the rest.
    pub fn spawn(self, targets: Vec<CleanupTarget>) -> CleanupRun {
        let (tx, rx) = unbounded();
        let handle = std::thread::spawn(move || {
            let mut summary = CleanupSummary::default();
            for target in targets {
                let _ = tx.send(CleanupMsg::Deleting {
                    project: target.project.clone(),
                    kind: target.kind,
                });
                let status = self.remove_target(&target);
                if status.is_success() {
                    summary.succeeded += 1;
                    if status == TargetStatus::Succeeded {
                        summary.reclaimed = summary.reclaimed.saturating_add(target.expected_bytes);
                    }
                } else {
                    summary.failed += 1;
                }
                let _ = tx.send(CleanupMsg::Result(TargetResult {
                    project: target.project,
                    kind: target.kind,
                    status,
                }));
            }
            let _ = tx.send(CleanupMsg::Done(summary));
        });
        CleanupRun { rx, handle: Some(handle) }
    }

    /// Removes exactly `<project>/<node_modules|dist>`. The project root and
    /// everything else inside it are never touched. An already-absent
    /// directory is the no-op success leg.
    fn remove_target(&self, target: &CleanupTarget) -> TargetStatus {
        let path = target.project.join(target.kind.dir_name());
        match fs::symlink_metadata(&path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => return TargetStatus::Skipped,
            Err(err) => return TargetStatus::Failed(err.to_string()),
            // A symlinked artifact holds no reclaimable bytes of its own and
            // points outside the project; leave it alone.
            Ok(meta) if meta.file_type().is_symlink() => return TargetStatus::Skipped,
            Ok(_) => {}
        }

        match self.mode {
            CleanupMode::Trash => match trash::delete(&path) {
                Ok(()) => TargetStatus::Succeeded,
                // Never fall back to permanent deletion here; the caller
                // only confirmed a recoverable move.
                Err(err) => TargetStatus::Failed(err.to_string()),
            },
            CleanupMode::Permanent => match fs::remove_dir_all(&path) {
                Ok(()) => TargetStatus::Succeeded,
                Err(err) if err.kind() == io::ErrorKind::NotFound => TargetStatus::Skipped,
                Err(err) => TargetStatus::Failed(err.to_string()),
            },
        }
    }
}

/// Handle to a running cleanup batch.
pub struct CleanupRun {
    rx: Receiver<CleanupMsg>,
    handle: Option<JoinHandle<()>>,
}

impl CleanupRun {
    pub fn messages(&self) -> &Receiver<CleanupMsg> {
        &self.rx
    }

    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
