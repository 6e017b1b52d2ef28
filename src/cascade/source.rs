//! Candidate definition files and their precedence ranks.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Precedence rank of a definition file.
///
/// Lower ranks are applied first, so a higher rank overrides a lower one for
/// the same variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Tier(pub u8);

impl Tier {
    /// Shared definitions for every service.
    pub const BASE: Tier = Tier(0);
    /// Definitions for a single service.
    pub const SERVICE: Tier = Tier(1);
    /// Local overrides kept outside the worktree.
    pub const CONTEXT: Tier = Tier(2);

    /// Numeric rank.
    pub fn rank(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One candidate definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileSource {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Precedence rank.
    pub tier: Tier,
    /// Human-readable tier name ("base", "service-specific", ...).
    pub label: String,
}

impl EnvFileSource {
    /// Create a new source.
    pub fn new(path: impl Into<PathBuf>, tier: Tier, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tier,
            label: label.into(),
        }
    }

    /// Base tier source.
    pub fn base(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Tier::BASE, "base")
    }

    /// Service-specific tier source.
    pub fn service(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Tier::SERVICE, "service-specific")
    }

    /// Context-override tier source.
    pub fn context(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Tier::CONTEXT, "context-override")
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
