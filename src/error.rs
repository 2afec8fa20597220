//! Error types for skill-packager.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when extracting SKILL.md frontmatter.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file does not start with the frontmatter delimiter.
    #[error("SKILL.md must start with frontmatter delimiter (---)")]
    MissingFrontmatter,

    /// The frontmatter is not closed with a second delimiter.
    #[error("SKILL.md frontmatter delimiter not closed with ---")]
    UnclosedFrontmatter,

    /// The file could not be read as UTF-8 text.
    #[error("Error reading SKILL.md: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// Underlying cause of an archive write failure.
#[derive(Debug, Error)]
pub enum ArchiveCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

/// Errors reported while validating, packaging, or scanning skills.
///
/// Every variant names the failing check and the path involved.
#[derive(Debug, Error)]
pub enum PackError {
    /// The skill identifier is not a valid skill name.
    #[error("Invalid skill name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The skill directory does not exist or is not a directory.
    #[error("Skill directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A directory exists but its entries cannot be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No SKILL.md directly inside the skill directory.
    #[error("SKILL.md not found in {}", .0.display())]
    MetadataNotFound(PathBuf),

    /// The SKILL.md frontmatter could not be extracted.
    #[error("Malformed frontmatter in {}: {source}", .path.display())]
    MalformedFrontmatter {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A required frontmatter field is absent or blank.
    #[error("SKILL.md frontmatter must include '{field}:' field ({})", .path.display())]
    MissingRequiredField { path: PathBuf, field: &'static str },

    /// Writing the archive failed; nothing was left behind.
    #[error("Failed to write archive {}: {source}", .path.display())]
    ArchiveWriteError {
        path: PathBuf,
        #[source]
        source: ArchiveCause,
    },

    /// An output location is unusable.
    #[error("Invalid output path {}: {source}", .path.display())]
    OutputPathError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PackError {
    /// Short kebab-case identifier of the failing check.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => "invalid-name",
            Self::DirectoryNotFound(_) => "directory-not-found",
            Self::DirectoryUnreadable { .. } => "directory-unreadable",
            Self::MetadataNotFound(_) => "metadata-not-found",
            Self::MalformedFrontmatter { .. } => "malformed-frontmatter",
            Self::MissingRequiredField { .. } => "missing-required-field",
            Self::ArchiveWriteError { .. } => "archive-write-error",
            Self::OutputPathError { .. } => "output-path-error",
        }
    }
}
