//! Frontmatter extraction for SKILL.md files.
//!
//! The header block between the two `---` delimiter lines is scanned line by
//! line for a fixed set of field prefixes. Values are taken literally after
//! trimming: no quote stripping, no escape handling. Only unindented lines
//! are top-level keys. Unknown lines are ignored so newer frontmatter keys
//! never break extraction.

use std::fs;
use std::path::Path;

use crate::error::ParseError;
use crate::skill::{AllowedTools, SkillMetadata};

const DELIMITER: &str = "---";

const NAME_PREFIX: &str = "name:";
const DESCRIPTION_PREFIX: &str = "description:";
const ALLOWED_TOOLS_PREFIX: &str = "allowed-tools:";

/// Read a SKILL.md file and extract its metadata.
pub fn read_metadata(path: &Path) -> Result<SkillMetadata, ParseError> {
    let content = fs::read_to_string(path)?;
    extract_metadata(&content)
}

/// Extract metadata from SKILL.md content.
///
/// # Errors
///
/// Returns an error if the first line is not `---` or the header block is
/// never closed by a second `---` line.
pub fn extract_metadata(content: &str) -> Result<SkillMetadata, ParseError> {
    let header = split_header(content)?;

    let mut name = None;
    let mut description = None;
    let mut allowed_tools = None;

    for line in header.lines() {
        // Indented lines belong to nested mappings.
        let line = line.trim_end();
        if name.is_none() {
            name = field_value(line, NAME_PREFIX);
        }
        if description.is_none() {
            description = field_value(line, DESCRIPTION_PREFIX);
        }
        if allowed_tools.is_none() {
            allowed_tools = field_value(line, ALLOWED_TOOLS_PREFIX);
        }
    }

    Ok(SkillMetadata {
        name,
        description,
        allowed_tools: AllowedTools::parse(allowed_tools.as_deref()),
    })
}

/// Return the header block, excluding both delimiter lines.
fn split_header(content: &str) -> Result<&str, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let Some(first_line) = lines.next() else {
        return Err(ParseError::MissingFrontmatter);
    };

    if first_line.trim() != DELIMITER {
        return Err(ParseError::MissingFrontmatter);
    }

    let start = first_line.len();
    let mut offset = start;
    for line in lines {
        if line.trim() == DELIMITER {
            return Ok(&content[start..offset]);
        }
        offset += line.len();
    }

    Err(ParseError::UnclosedFrontmatter)
}

/// Case-insensitive prefix match returning the trimmed remainder.
fn field_value(line: &str, prefix: &str) -> Option<String> {
    let head = line.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    Some(line[prefix.len()..].trim().to_string())
}
