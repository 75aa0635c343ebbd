//! File System Utilities
//!
//! Settings and log directory management.

use crate::constants::{PROJECT_APPLICATION, PROJECT_ORGANIZATION, PROJECT_QUALIFIER};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION).ok_or_else(
        || Error::Invalid {
            message: "Could not determine project directories".to_string(),
        },
    )
}

/// Create `dir` if missing and return an owned copy of it
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}

/// Get or create the panel's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/res-panel/` or `$XDG_CONFIG_HOME/res-panel/`
/// - **macOS**: `~/Library/Application Support/com.respanel.res-panel/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\respanel\res-panel\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.config_dir())
}

/// Get or create the data directory (rolling log files)
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/res-panel/`
/// - **macOS**: `~/Library/Application Support/com.respanel.res-panel/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\respanel\res-panel\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_dir())
}

/// Check if running in development mode
pub fn is_development() -> bool {
    cfg!(debug_assertions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("a").join("b");

        let created = ensure_dir(&nested).expect("create");

        assert!(created.is_dir());
        assert_eq!(ensure_dir(&nested).expect("existing"), nested);
    }
}
