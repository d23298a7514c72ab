use std::path::{Path, PathBuf};

use byte_unit::{Byte, UnitType};
use dirs_next as dirs;

/// Format bytes into a human-readable string.
pub fn format_bytes(size: u64) -> String {
    if size == 0 {
        "0 B".to_string()
    } else {
        let adjusted = Byte::from_u64(size).get_appropriate_unit(UnitType::Decimal);
        format!("{adjusted:#.2}")
    }
}

/// Replace the home directory prefix with `~` to make output easier to read.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        let mut display = PathBuf::from("~");
        display.push(stripped);
        return display.display().to_string();
    }

    path.display().to_string()
}

/// The scan root: the given path, or the home directory when none was
/// supplied (falling back to the current directory on homeless systems).
pub fn resolve_root(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        path
    } else if let Some(home) = dirs::home_dir() {
        home
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}
