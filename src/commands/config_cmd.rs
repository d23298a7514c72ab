use std::path::Path;
use std::process::Command;

use crate::config::{Config, config_file_path, ensure_config_file};
use crate::error::AppError;
use crate::utils::display_path;

pub struct ConfigOptions {
    pub show_path: bool,
    pub edit: bool,
    pub add_exclude: Option<String>,
}

pub fn execute_config(options: ConfigOptions) -> Result<(), AppError> {
    if options.show_path {
        println!("Configuration file: {}", display_path(&config_file_path()?));
        return Ok(());
    }

    if let Some(pattern) = options.add_exclude {
        let mut config = Config::load()?;
        config.append_exclude(pattern.clone());
        config.save()?;
        println!("Added exclude pattern '{}'.", pattern);
        return Ok(());
    }

    if options.edit {
        let path = ensure_config_file()?;
        return open_editor(&path);
    }

    // Bare `vuesweep config`: the effective rules, built-in defaults merged
    // with whatever the file overrides.
    print_effective_rules(&Config::load()?)
}

fn print_effective_rules(config: &Config) -> Result<(), AppError> {
    println!("Configuration file: {}", display_path(&config_file_path()?));
    println!("Skip-set: {}", config.skip_dirs.join(", "));
    println!("Vue signatures: {}", config.signatures.join(", "));
    if config.exclude.is_empty() {
        println!("Exclude patterns: (none)");
    } else {
        println!("Exclude patterns:");
        for pattern in &config.exclude {
            println!("    • {pattern}");
        }
    }
    Ok(())
}

fn open_editor(path: &Path) -> Result<(), AppError> {
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|err| AppError::Editor(err.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Editor(format!("Editor exited with status {}", status)))
    }
}
