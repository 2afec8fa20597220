//! Skill manifest generation.
//!
//! Scans the immediate subdirectories of a skills directory and renders one
//! Markdown document listing every skill with a usable name and description.
//! Directories that fail extraction are skipped and reported, never fatal.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::{dir_name, find_skill_md, list_skill_dirs};
use crate::error::{PackError, ParseError};
use crate::frontmatter::read_metadata;
use crate::skill::{AllowedTools, SKILL_FILE_NAME};
use crate::validation::name_mismatch;

/// File name used when the output path names a directory.
pub const MANIFEST_FILE_NAME: &str = "SKILLS.md";

/// Extensions treated as a document path rather than a directory.
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Token substituted for the home directory in reference paths.
pub const HOME_ALIAS: &str = "~";

const PREAMBLE: &str = "# Skills

Skills are folders of instructions, scripts, and resources that extend what \
you can do. Each skill below is summarized by its name and description; the \
full instructions live in the skill's SKILL.md and are only loaded when needed.

## How to Use Skills

1. Scan the list below for a skill whose description matches the task at hand.
2. Read the referenced SKILL.md file in full before starting the task.
3. Follow its instructions, using any bundled scripts or resources it points to.

## Available Skills
";

/// One skill listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub description: String,
    pub allowed_tools: AllowedTools,
    /// Portable path to the SKILL.md file.
    pub reference_path: String,
}

/// Why a directory was left out of the manifest.
#[derive(Debug)]
pub enum SkipReason {
    MissingMetadata,
    Malformed(ParseError),
    MissingField(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMetadata => write!(f, "no {SKILL_FILE_NAME} found"),
            Self::Malformed(err) => write!(f, "{err}"),
            Self::MissingField(field) => write!(f, "missing or blank '{field}' field"),
        }
    }
}

/// A skipped directory and the reason it was skipped.
#[derive(Debug)]
pub struct SkippedSkill {
    pub dir_name: String,
    pub reason: SkipReason,
}

/// Result of scanning a skills directory.
#[derive(Debug, Default)]
pub struct ManifestReport {
    /// Number of candidate directories examined.
    pub scanned: usize,
    /// Included skills in enumeration order.
    pub entries: Vec<ManifestEntry>,
    pub skipped: Vec<SkippedSkill>,
}

/// Scan `skills_dir` and collect manifest entries.
///
/// `home` is the directory replaced by `~` in reference paths.
pub fn scan_skills(skills_dir: &Path, home: Option<&Path>) -> Result<ManifestReport, PackError> {
    if !skills_dir.is_dir() {
        return Err(PackError::DirectoryNotFound(skills_dir.to_path_buf()));
    }
    let skills_dir = std::path::absolute(skills_dir).unwrap_or_else(|_| skills_dir.to_path_buf());

    let mut report = ManifestReport::default();

    for dir in list_skill_dirs(&skills_dir)? {
        report.scanned += 1;
        match load_entry(&dir, home) {
            Ok(entry) => {
                tracing::debug!(skill = %entry.name, path = %entry.reference_path, "skill included");
                report.entries.push(entry);
            }
            Err(reason) => {
                let dir_name = dir_name(&dir);
                tracing::warn!("Skipped {dir_name}: {reason}");
                report.skipped.push(SkippedSkill { dir_name, reason });
            }
        }
    }

    Ok(report)
}

fn load_entry(dir: &Path, home: Option<&Path>) -> Result<ManifestEntry, SkipReason> {
    let metadata_path = find_skill_md(dir).ok_or(SkipReason::MissingMetadata)?;
    let metadata = read_metadata(&metadata_path).map_err(SkipReason::Malformed)?;

    let name = metadata
        .required_name()
        .ok_or(SkipReason::MissingField("name"))?;
    let description = metadata
        .required_description()
        .ok_or(SkipReason::MissingField("description"))?;

    if let Some(mismatch) = name_mismatch(name, dir) {
        tracing::warn!("{mismatch}");
    }

    Ok(ManifestEntry {
        name: name.to_string(),
        description: description.to_string(),
        allowed_tools: metadata.allowed_tools.clone(),
        reference_path: reference_path(&metadata_path, home),
    })
}

/// Render a path with `/` separators and the home directory shown as `~`.
pub fn reference_path(path: &Path, home: Option<&Path>) -> String {
    let normalized = normalize_separators(&path.to_string_lossy());

    let Some(home) = home else {
        return normalized;
    };
    let home = normalize_separators(&home.to_string_lossy());
    let home = home.trim_end_matches('/');
    if home.is_empty() {
        return normalized;
    }

    match normalized.strip_prefix(home) {
        Some("") => HOME_ALIAS.to_string(),
        Some(rest) if rest.starts_with('/') => format!("{HOME_ALIAS}{rest}"),
        _ => normalized,
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Render the manifest document.
pub fn render_manifest(entries: &[ManifestEntry]) -> String {
    let mut out = String::from(PREAMBLE);

    for entry in entries {
        out.push('\n');
        out.push_str(&format!("- **{}**: {}", entry.name, entry.description));
        if let Some(annotation) = entry.allowed_tools.annotation() {
            out.push(' ');
            out.push_str(&annotation);
        }
        out.push_str(&format!(" (Full skill: `{}`)\n", entry.reference_path));
    }

    out
}

/// Resolve where the manifest should be written.
///
/// An existing directory, or a path without a document extension, receives
/// the manifest under [`MANIFEST_FILE_NAME`].
pub fn resolve_output_path(output: Option<&Path>, default_dir: &Path) -> PathBuf {
    let Some(output) = output else {
        return default_dir.join(MANIFEST_FILE_NAME);
    };

    let is_document = output
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        });

    if output.is_dir() || !is_document {
        output.join(MANIFEST_FILE_NAME)
    } else {
        output.to_path_buf()
    }
}

/// Render and write the manifest, replacing any existing file.
pub fn write_manifest(report: &ManifestReport, output_path: &Path) -> Result<(), PackError> {
    let output_err = |source| PackError::OutputPathError {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_err)?;
    }
    fs::write(output_path, render_manifest(&report.entries)).map_err(output_err)?;

    tracing::info!(
        path = %output_path.display(),
        skills = report.entries.len(),
        "manifest written"
    );
    Ok(())
}
