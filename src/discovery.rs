//! Skill directory discovery utilities.
//!
//! Locates the metadata file inside a skill directory and enumerates the
//! immediate subdirectories of a parent skills directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PackError;
use crate::skill::SKILL_FILE_NAME;

/// Find the SKILL.md file in a directory.
///
/// Prefers uppercase `SKILL.md` over lowercase `skill.md`.
pub fn find_skill_md(skill_dir: &Path) -> Option<PathBuf> {
    for name in [SKILL_FILE_NAME, "skill.md"] {
        let path = skill_dir.join(name);
        if path.is_file() {
            return Some(path);
        }
    }
    None
}

/// List the immediate subdirectories of `root` in enumeration order.
///
/// Failing to read `root` itself is an error; entries that cannot be read
/// are logged and skipped.
pub fn list_skill_dirs(root: &Path) -> Result<Vec<PathBuf>, PackError> {
    let entries = fs::read_dir(root).map_err(|source| PackError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        // Follows symlinked skill directories.
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    Ok(dirs)
}

/// Extract the directory name from a path.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
