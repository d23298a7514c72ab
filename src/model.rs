use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Inactivity reported for a project whose activity timestamp could not be
/// determined at all. Keeps such projects at the top of the "stale" ordering.
pub const NEVER_ACTIVE_DAYS: u64 = 99_999;

const SECONDS_PER_DAY: u64 = 86_400;

/// One discovered Vue project, with the metrics the cleanup decision is
/// based on. `selected` is presentation state and is never persisted.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub path: PathBuf,
    pub name: String,
    pub node_modules_size: u64,
    pub dist_size: u64,
    pub last_active: Option<SystemTime>,
    pub selected: bool,
}

impl ProjectRecord {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        ProjectRecord {
            path,
            name,
            node_modules_size: 0,
            dist_size: 0,
            last_active: None,
            selected: false,
        }
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.node_modules_size.saturating_add(self.dist_size)
    }

    /// Whole days since the last observed activity, relative to `now`.
    pub fn inactive_days(&self, now: SystemTime) -> u64 {
        match self.last_active {
            Some(ts) => match now.duration_since(ts) {
                Ok(elapsed) => elapsed.as_secs() / SECONDS_PER_DAY,
                // Activity in the future counts as active right now.
                Err(_) => 0,
            },
            None => NEVER_ACTIVE_DAYS,
        }
    }

    pub fn node_modules_dir(&self) -> PathBuf {
        self.path.join(TargetKind::NodeModules.dir_name())
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.path.join(TargetKind::Dist.dir_name())
    }
}

/// The collection of records produced by one scan, keyed by project path.
/// Owned by the foreground; workers only propose records over a channel.
#[derive(Debug, Clone, Default)]
pub struct ProjectSet {
    records: BTreeMap<PathBuf, ProjectRecord>,
}

impl ProjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for its path.
    pub fn insert(&mut self, record: ProjectRecord) {
        self.records.insert(record.path.clone(), record);
    }

    pub fn get(&self, path: &Path) -> Option<&ProjectRecord> {
        self.records.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut ProjectRecord> {
        self.records.get_mut(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.records.values()
    }

    pub fn total_reclaimable(&self) -> u64 {
        self.records.values().map(ProjectRecord::reclaimable_bytes).sum()
    }

    /// Records with at least `min_days` of inactivity.
    pub fn filter_inactive(&self, min_days: u64, now: SystemTime) -> Vec<&ProjectRecord> {
        self.records.values().filter(|r| r.inactive_days(now) >= min_days).collect()
    }

    /// Display order: most inactive first, largest reclaimable first within a
    /// tie, path ascending as the final tie-break.
    pub fn sorted_for_display(&self, now: SystemTime) -> Vec<&ProjectRecord> {
        let mut rows: Vec<&ProjectRecord> = self.records.values().collect();
        rows.sort_by(|a, b| {
            b.inactive_days(now)
                .cmp(&a.inactive_days(now))
                .then_with(|| b.reclaimable_bytes().cmp(&a.reclaimable_bytes()))
                .then_with(|| a.path.cmp(&b.path))
        });
        rows
    }

    pub fn estimate_selected(&self) -> u64 {
        self.records
            .values()
            .filter(|r| r.selected)
            .map(ProjectRecord::reclaimable_bytes)
            .sum()
    }

    pub fn selected(&self) -> Vec<&ProjectRecord> {
        self.records.values().filter(|r| r.selected).collect()
    }

    pub fn select_all(&mut self) {
        for record in self.records.values_mut() {
            record.selected = true;
        }
    }

    pub fn select_none(&mut self) {
        for record in self.records.values_mut() {
            record.selected = false;
        }
    }

    pub fn select_inactive_only(&mut self, min_days: u64, now: SystemTime) {
        for record in self.records.values_mut() {
            record.selected = record.inactive_days(now) >= min_days;
        }
    }

    /// Zeroes the size fields of a project whose artifacts were removed.
    pub fn mark_cleaned(&mut self, path: &Path, kind: TargetKind) {
        if let Some(record) = self.records.get_mut(path) {
            match kind {
                TargetKind::NodeModules => record.node_modules_size = 0,
                TargetKind::Dist => record.dist_size = 0,
            }
        }
    }
}

/// Which removable artifact of a project a cleanup target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    NodeModules,
    Dist,
}

impl TargetKind {
    pub const ALL: [TargetKind; 2] = [TargetKind::NodeModules, TargetKind::Dist];

    pub fn dir_name(&self) -> &'static str {
        match self {
            TargetKind::NodeModules => "node_modules",
            TargetKind::Dist => "dist",
        }
    }
}

/// Terminal state of one cleanup target. `Skipped` means the directory was
/// already absent; it counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    Succeeded,
    Skipped,
    Failed(String),
}

impl TargetStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, TargetStatus::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct TargetResult {
    pub project: PathBuf,
    pub kind: TargetKind,
    pub status: TargetStatus,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub reclaimed: u64,
}
