//! Core skill types and constants.

/// Maximum length for skill names (in characters).
pub const MAX_SKILL_NAME_LENGTH: usize = 64;

/// Advisory maximum length for descriptions (in characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Name of the metadata file at the root of every skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// Extension of packaged skill archives.
pub const ARCHIVE_EXTENSION: &str = "skill";

/// Metadata extracted from the frontmatter of a SKILL.md file.
///
/// Values are kept exactly as written after trimming; blank values are
/// preserved so callers can decide what counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub allowed_tools: AllowedTools,
}

impl SkillMetadata {
    /// The declared name, if present and not blank.
    pub fn required_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// The description, if present and not blank.
    pub fn required_description(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Declared tool allow-list of a skill.
///
/// An empty list restricts the skill to no tools, which is different from
/// not declaring a list at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowedTools {
    /// Field absent or blank.
    #[default]
    Unspecified,
    /// `[]`
    Empty,
    /// `[Read, Bash]`
    List(Vec<String>),
    /// Any other scalar, kept verbatim.
    Raw(String),
}

impl AllowedTools {
    /// Interpret the raw `allowed-tools` value.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Unspecified;
        };

        let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) else {
            return Self::Raw(raw.to_string());
        };

        let tools: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();

        if tools.is_empty() {
            Self::Empty
        } else {
            Self::List(tools)
        }
    }

    /// Manifest annotation, e.g. `[Tools: Read, Bash]`.
    pub fn annotation(&self) -> Option<String> {
        match self {
            Self::Unspecified => None,
            Self::Empty => Some("[Tools: none]".to_string()),
            Self::List(tools) => Some(format!("[Tools: {}]", tools.join(", "))),
            Self::Raw(raw) => Some(format!("[Tools: {raw}]")),
        }
    }
}
