use anyhow::Result;
use std::path::{Path, PathBuf};

/// Locate a loader program.
///
/// Lookup order: an explicit path, then `./node_modules/.bin/<name>`,
/// then the system PATH.
pub fn find_binary(name: &str) -> Result<PathBuf> {
    let mut checked_paths = Vec::new();

    // 1. Explicit path (absolute or relative with a separator)
    let explicit = Path::new(name);
    if explicit.components().count() > 1 || explicit.is_absolute() {
        checked_paths.push(format!("Explicit: {:?}", explicit));
        if explicit.is_file() {
            return Ok(explicit.to_path_buf());
        }
    }

    // 2. Locally installed npm binaries
    if let Ok(cwd) = std::env::current_dir() {
        let local = cwd.join("node_modules").join(".bin").join(name);
        checked_paths.push(format!("node_modules: {:?}", local));
        if local.is_file() {
            return Ok(local);
        }
    }

    // 3. Fallback to system PATH
    if let Ok(path) = which::which(name) {
        return Ok(path);
    }
    checked_paths.push("System PATH".to_string());

    Err(anyhow::anyhow!(
        "Could not find loader binary '{}'. Checked paths:\n{}",
        name,
        checked_paths.join("\n")
    ))
}
