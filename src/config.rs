//! Resolved run configuration.
//!
//! CLI arguments are optional; this module fills in the defaults so the
//! library functions always receive explicit paths. The home directory used
//! for `~` aliasing is resolved here once and passed down.

use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory used for aliasing.
pub const HOME_ENV: &str = "SKILL_PACKAGER_HOME";

/// Inputs for `pack`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    pub skill_name: String,
    /// Directory containing the skill folder.
    pub source_dir: PathBuf,
    /// Directory receiving `<skill-name>.skill`.
    pub output_dir: PathBuf,
}

impl PackConfig {
    pub fn resolve(
        skill_name: String,
        source_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        cwd: &Path,
    ) -> Self {
        Self {
            skill_name,
            source_dir: source_dir.unwrap_or_else(|| cwd.to_path_buf()),
            output_dir: output_dir.unwrap_or_else(|| cwd.to_path_buf()),
        }
    }

    /// Where the skill folder is expected.
    pub fn skill_dir(&self) -> PathBuf {
        self.source_dir.join(&self.skill_name)
    }
}

/// Inputs for `manifest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    pub skills_dir: PathBuf,
    /// Output as given; see [`crate::resolve_output_path`].
    pub output: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
}

impl ManifestConfig {
    /// An explicit home wins over `dirs::home_dir()`.
    pub fn resolve(skills_dir: PathBuf, output: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            skills_dir,
            output,
            home_dir: home.or_else(dirs::home_dir),
        }
    }
}

/// The working directory, or `.` if it cannot be determined.
pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
