//! Package Agent Skills into portable `.skill` archives and aggregate their
//! metadata into a Markdown manifest.
//!
//! A skill is a directory holding a `SKILL.md` file whose frontmatter
//! declares `name`, `description`, and optionally `allowed-tools`, plus any
//! supporting files.

pub mod archive;
pub mod config;
pub mod discovery;
pub mod error;
pub mod frontmatter;
pub mod manifest;
pub mod skill;
pub mod validation;

pub use archive::{pack_skill, package_skill, PackReport};
pub use config::{ManifestConfig, PackConfig};
pub use discovery::{dir_name, find_skill_md, list_skill_dirs};
pub use error::{PackError, ParseError};
pub use frontmatter::{extract_metadata, read_metadata};
pub use manifest::{
    reference_path, render_manifest, resolve_output_path, scan_skills, write_manifest,
    ManifestEntry, ManifestReport, SkipReason, SkippedSkill,
};
pub use skill::{AllowedTools, SkillMetadata, ARCHIVE_EXTENSION, MAX_SKILL_NAME_LENGTH};
pub use validation::{
    name_mismatch, validate_skill_dir, validate_skill_name, NameMismatch, ValidatedSkill,
};
