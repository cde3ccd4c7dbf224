//! Filesystem locations used by navguard.
//!
//! - config: `.navguard.yaml`, found by walking up from the working directory
//! - data:   `~/.navguard/` (overridable with `NAVGUARD_HOME`), logs live under it

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name looked up when no config path is given.
pub const CONFIG_FILE_NAME: &str = ".navguard.yaml";

/// Environment variable that relocates the data directory.
pub const HOME_ENV: &str = "NAVGUARD_HOME";

/// The navguard data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".navguard"))
}

/// Find `.navguard.yaml` walking up the directory tree from `start`.
pub fn find_config_walking_up(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Resolve an explicit config path, or discover one from the working directory.
pub fn resolve_config(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    find_config_walking_up(&cwd).with_context(|| {
        format!(
            "No {} found in {} or any parent directory. Run `navguard init` first.",
            CONFIG_FILE_NAME,
            cwd.display()
        )
    })
}
