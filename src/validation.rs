//! Skill validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. `name`: lowercase ASCII letters, digits, and hyphens, at most 64 chars
//! 2. the skill directory exists
//! 3. a SKILL.md sits directly inside it
//! 4. the frontmatter is delimited and declares `name` and `description`
//!
//! A declared name that differs from the directory name is advisory only and
//! is reported through [`name_mismatch`], never as a failure.

use std::path::{Path, PathBuf};

use unicode_normalization::UnicodeNormalization;

use crate::discovery::{dir_name, find_skill_md};
use crate::error::PackError;
use crate::frontmatter::read_metadata;
use crate::skill::{SkillMetadata, MAX_DESCRIPTION_LENGTH, MAX_SKILL_NAME_LENGTH};

/// A skill directory that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedSkill {
    /// The validated skill identifier.
    pub name: String,
    /// Path to the skill directory.
    pub dir_path: PathBuf,
    /// Path to the SKILL.md file itself.
    pub metadata_path: PathBuf,
    /// Extracted frontmatter.
    pub metadata: SkillMetadata,
}

/// A declared name that does not match the skill directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMismatch {
    pub dir: String,
    pub declared: String,
}

impl std::fmt::Display for NameMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "declared name '{}' does not match directory name '{}'",
            self.declared, self.dir
        )
    }
}

/// Validate the format of a skill identifier.
pub fn validate_skill_name(name: &str) -> Result<(), PackError> {
    let valid_chars = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars {
        return Err(PackError::InvalidName {
            name: name.to_string(),
            reason: "must be lowercase letters, numbers, hyphens",
        });
    }

    if name.chars().count() > MAX_SKILL_NAME_LENGTH {
        return Err(PackError::InvalidName {
            name: name.to_string(),
            reason: "exceeds 64 characters",
        });
    }

    Ok(())
}

/// Validate a skill directory for packaging.
///
/// `skill_name` is the identifier the caller asked for; `skill_dir` is where
/// that skill is expected to live.
pub fn validate_skill_dir(skill_name: &str, skill_dir: &Path) -> Result<ValidatedSkill, PackError> {
    validate_skill_name(skill_name)?;

    if !skill_dir.is_dir() {
        return Err(PackError::DirectoryNotFound(skill_dir.to_path_buf()));
    }

    let metadata_path = find_skill_md(skill_dir)
        .ok_or_else(|| PackError::MetadataNotFound(skill_dir.to_path_buf()))?;

    let metadata =
        read_metadata(&metadata_path).map_err(|source| PackError::MalformedFrontmatter {
            path: metadata_path.clone(),
            source,
        })?;

    if metadata.required_name().is_none() {
        return Err(PackError::MissingRequiredField {
            path: metadata_path,
            field: "name",
        });
    }
    let Some(description) = metadata.required_description() else {
        return Err(PackError::MissingRequiredField {
            path: metadata_path,
            field: "description",
        });
    };

    // Advisory only.
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        tracing::warn!(
            skill = skill_name,
            length,
            limit = MAX_DESCRIPTION_LENGTH,
            "description exceeds the recommended length"
        );
    }

    tracing::debug!(skill = skill_name, path = %metadata_path.display(), "skill validated");

    Ok(ValidatedSkill {
        name: skill_name.to_string(),
        dir_path: skill_dir.to_path_buf(),
        metadata_path,
        metadata,
    })
}

/// Compare a declared name with the directory name (NFKC normalized).
pub fn name_mismatch(declared: &str, skill_dir: &Path) -> Option<NameMismatch> {
    let dir = dir_name(skill_dir);
    let dir_norm: String = dir.nfkc().collect();
    let declared_norm: String = declared.trim().nfkc().collect();
    if dir_norm == declared_norm {
        None
    } else {
        Some(NameMismatch {
            dir,
            declared: declared.trim().to_string(),
        })
    }
}
