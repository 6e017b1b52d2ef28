//! Flat `NAME=VALUE` definition file parsing.
//!
//! The format is deliberately lenient:
//! - blank lines and lines whose first non-whitespace character is `#` are skipped
//! - the first `=` separates the name from the value
//! - the name is trimmed, the value is kept exactly as written
//! - lines without `=` or with an empty name are skipped, never rejected
//! - repeated names are all listed, and the last assignment wins

use tracing::debug;

/// Comment marker for full-line comments.
pub const COMMENT_MARKER: char = '#';

/// Separator between a variable name and its value.
pub const ASSIGNMENT_SEPARATOR: char = '=';

/// UTF-8 byte order mark some editors write at the start of a file.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Result of reading one definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEnvFile {
    /// Whether the file was present at read time.
    pub existed: bool,
    /// Names in file order, duplicates kept.
    pub variable_names: Vec<String>,
    /// Name/value pairs in first-seen order, last assignment wins.
    raw_pairs: Vec<(String, String)>,
}

impl ParsedEnvFile {
    /// Record for a file that was not found.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Parse file contents.
    pub fn parse(content: &str) -> Self {
        let mut parsed = Self {
            existed: true,
            ..Self::default()
        };

        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                continue;
            }

            let Some((name, value)) = line.split_once(ASSIGNMENT_SEPARATOR) else {
                debug!(line = index + 1, "Skipping line without assignment");
                continue;
            };

            let name = name.trim();
            if name.is_empty() {
                debug!(line = index + 1, "Skipping assignment with empty name");
                continue;
            }

            parsed.variable_names.push(name.to_string());
            parsed.insert(name, value);
        }

        parsed
    }

    fn insert(&mut self, name: &str, value: &str) {
        match self.raw_pairs.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.raw_pairs.push((name.to_string(), value.to_string())),
        }
    }

    /// Literal value assigned to `name`, if any.
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.raw_pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over name/value pairs.
    pub fn raw_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.raw_pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.raw_pairs.len()
    }

    /// Whether no assignment was found.
    pub fn is_empty(&self) -> bool {
        self.raw_pairs.is_empty()
    }
}
