use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, unbounded};

use crate::config::Rules;
use crate::error::AppError;
use crate::model::ProjectRecord;
use crate::scanner::Scanner;

/// Process-wide counter; a new session always outranks every earlier one.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Messages handed back from the scan worker. Each carries the session id
/// it belongs to so the foreground can reject stragglers from a superseded
/// scan.
#[derive(Debug)]
pub enum ScanMsg {
    Project { session: u64, record: ProjectRecord },
    Done { session: u64, found: usize, cancelled: bool },
}

impl ScanMsg {
    pub fn session(&self) -> u64 {
        match self {
            ScanMsg::Project { session, .. } | ScanMsg::Done { session, .. } => *session,
        }
    }
}

/// One scan of one root directory, running on a dedicated worker thread.
///
/// The foreground owns the record collection and consumes `messages()`;
/// the worker only proposes records through the channel. Dropping the
/// session signals cancellation so a superseded scan winds down at its next
/// directory boundary.
#[derive(Debug)]
pub struct ScanSession {
    id: u64,
    root: PathBuf,
    cancel: Arc<AtomicBool>,
    rx: Receiver<ScanMsg>,
    handle: Option<JoinHandle<()>>,
}

impl ScanSession {
    /// Validates the root and spawns the scan worker. An invalid root fails
    /// fast before any thread exists.
    pub fn start(root: PathBuf, rules: Arc<Rules>, verbose: bool) -> Result<Self, AppError> {
        if !root.is_dir() {
            return Err(AppError::InvalidRoot(root));
        }

        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = unbounded();

        let worker_root = root.clone();
        let worker_cancel = Arc::clone(&cancel);
        let handle = std::thread::spawn(move || {
            let scanner = Scanner::new(rules, worker_cancel, verbose);
            let found = scanner.scan(&worker_root, |record| {
                tx.send(ScanMsg::Project { session: id, record }).is_ok()
            });
            let cancelled = scanner.is_cancelled();
            let _ = tx.send(ScanMsg::Done { session: id, found, cancelled });
        });

        Ok(ScanSession { id, root, cancel, rx, handle: Some(handle) })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Stream of worker messages, ending after `Done` when the worker hangs
    /// up its sender.
    pub fn messages(&self) -> &Receiver<ScanMsg> {
        &self.rx
    }

    /// True when the message belongs to this session; results from an
    /// earlier, superseded scan must not be applied.
    pub fn accepts(&self, msg: &ScanMsg) -> bool {
        msg.session() == self.id
    }

    /// Requests cooperative cancellation at the worker's next directory
    /// boundary. Records already received remain valid.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Waits for the worker to finish. Call after `Done` (or after
    /// `cancel()`) to avoid blocking on a long walk.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        // A dropped session is a superseded session.
        self.cancel.store(true, Ordering::Relaxed);
    }
}
