use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use dirs_next as dirs;
use globset::{Glob, GlobSet};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Directory names that are never descended into, for traversal, size
/// computation and activity detection alike.
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    ".git",
    ".idea",
    ".vscode",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".vercel",
];

/// Dependency names (in package.json) that mark a project as Vue-based.
const DEFAULT_SIGNATURES: &[&str] = &[
    "vue",
    "@vue/cli-service",
    "@vitejs/plugin-vue",
    "vite",
    "nuxt",
    "nuxt3",
    "vitepress",
    "pinia",
    "vue-router",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    #[serde(default = "default_signatures")]
    pub signatures: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_skip_dirs() -> Vec<String> {
    DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect()
}

fn default_signatures() -> Vec<String> {
    DEFAULT_SIGNATURES.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            skip_dirs: default_skip_dirs(),
            signatures: default_signatures(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let path = config_file_path()?;
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        let path = config_file_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = fs::File::create(path)?;
        let contents = toml::to_string_pretty(self)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    pub fn append_exclude(&mut self, value: String) {
        if !self.exclude.iter().any(|existing| existing == &value) {
            self.exclude.push(value);
        }
    }

    pub fn compile_excludes(&self) -> Result<Option<GlobSet>, AppError> {
        if self.exclude.is_empty() {
            return Ok(None);
        }

        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &self.exclude {
            let expanded = expand_home(pattern)?;
            builder.add(Glob::new(&expanded)?);
        }

        Ok(Some(builder.build()?))
    }

    /// Compile the configured skip-set, Vue signatures and exclude globs
    /// into the form the scan pipeline consumes.
    pub fn compile(&self) -> Result<Rules, AppError> {
        Ok(Rules {
            skip_dirs: self.skip_dirs.iter().cloned().collect(),
            signatures: self.signatures.iter().map(|s| s.to_ascii_lowercase()).collect(),
            exclude: self.compile_excludes()?,
        })
    }
}

/// Compiled rule set shared by the walker, classifier and metrics collector.
/// Cheap to clone across the worker-thread boundary.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    pub skip_dirs: HashSet<String>,
    pub signatures: HashSet<String>,
    pub exclude: Option<GlobSet>,
}

impl Rules {
    pub fn shared(self) -> Arc<Rules> {
        Arc::new(self)
    }

    pub fn is_skipped_name(&self, name: &str) -> bool {
        self.skip_dirs.contains(name)
    }

    pub fn is_excluded(&self, path: &std::path::Path) -> bool {
        if let Some(set) = &self.exclude {
            let candidate = if path.is_absolute() {
                path.to_string_lossy().to_string()
            } else {
                match std::env::current_dir() {
                    Ok(cwd) => cwd.join(path).to_string_lossy().to_string(),
                    Err(_) => path.to_string_lossy().to_string(),
                }
            };
            set.is_match(&candidate)
        } else {
            false
        }
    }
}

pub fn config_file_path() -> Result<PathBuf, AppError> {
    let config_root = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or_else(|| {
            AppError::config("Unable to determine configuration directory for this platform")
        })?;
    Ok(config_root.join("vuesweep").join("config.toml"))
}

pub fn ensure_config_file() -> Result<PathBuf, AppError> {
    let path = config_file_path()?;
    if !path.exists() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let default = Config::default();
        let contents = toml::to_string_pretty(&default)?;
        fs::write(&path, contents)?;
    }
    Ok(path)
}

fn expand_home(value: &str) -> Result<String, AppError> {
    if !value.starts_with('~') {
        return Ok(value.to_string());
    }
    let home_dir = dirs::home_dir().ok_or_else(|| {
        AppError::config("Unable to expand '~' because the home directory is unknown")
    })?;
    if value == "~" {
        Ok(home_dir.display().to_string())
    } else if let Some(stripped) = value.strip_prefix("~/") {
        Ok(home_dir.join(stripped).display().to_string())
    } else {
        Ok(value.to_string())
    }
}
