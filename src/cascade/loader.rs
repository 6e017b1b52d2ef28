//! Tiered loading of definition files into an [`EffectiveEnvironment`].

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use tracing::{debug, info, instrument};

use super::environment::EffectiveEnvironment;
use super::parser::ParsedEnvFile;
use super::source::{EnvFileSource, Tier};
use crate::error::CascadeError;
use crate::metrics;

/// Filesystem access needed by the loader.
pub trait SourceReader {
    /// Whether a file exists at `path`.
    ///
    /// Errors other than "not found" (permissions on a parent directory,
    /// symlink loops) must be returned, not folded into `false`.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Read the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// [`SourceReader`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// One source together with what was read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    /// The source descriptor.
    pub source: EnvFileSource,
    /// Parse result.
    pub parsed: ParsedEnvFile,
}

/// Which names each tier defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    tiers: BTreeMap<Tier, LoadedSource>,
}

impl Provenance {
    /// Parse result for `tier`.
    pub fn get(&self, tier: Tier) -> Option<&LoadedSource> {
        self.tiers.get(&tier)
    }

    /// Names defined by `tier`, in file order. Empty for unknown tiers.
    pub fn variables(&self, tier: Tier) -> &[String] {
        self.tiers
            .get(&tier)
            .map(|loaded| loaded.parsed.variable_names.as_slice())
            .unwrap_or(&[])
    }

    /// Tiers that define `name`, lowest first.
    pub fn defined_in(&self, name: &str) -> Vec<Tier> {
        self.tiers
            .iter()
            .filter(|(_, loaded)| loaded.parsed.raw_value(name).is_some())
            .map(|(tier, _)| *tier)
            .collect()
    }

    /// Iterate over tiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedSource> {
        self.tiers.values()
    }

    /// Number of tiers recorded.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether no tier was recorded.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Loads an ordered list of sources onto an environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCascadeLoader<R = FsReader> {
    reader: R,
}

impl EnvCascadeLoader<FsReader> {
    /// Loader that reads from the filesystem.
    pub fn new() -> Self {
        Self { reader: FsReader }
    }
}

impl<R: SourceReader> EnvCascadeLoader<R> {
    /// Loader with a custom reader.
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Apply `sources`, lowest tier first, on top of `environment`.
    ///
    /// Missing files count as empty. An existing file that cannot be read
    /// aborts the whole load.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub fn load(
        &self,
        sources: &[EnvFileSource],
        mut environment: EffectiveEnvironment,
    ) -> Result<(EffectiveEnvironment, Provenance), CascadeError> {
        for pair in sources.windows(2) {
            if pair[0].tier >= pair[1].tier {
                return Err(CascadeError::SourcesOutOfOrder {
                    previous: pair[0].tier,
                    next: pair[1].tier,
                });
            }
        }

        let mut provenance = Provenance::default();

        for source in sources {
            let parsed = self.read_source(source)?;

            for (name, value) in parsed.raw_pairs() {
                environment.set(name, value);
            }

            if parsed.existed {
                info!(
                    tier = %source.tier,
                    label = %source.label,
                    path = %source.path.display(),
                    variables = parsed.variable_names.len(),
                    "Loaded env file"
                );
                metrics::inc_sources_loaded();
                metrics::add_variables_applied(parsed.len() as u64);
            } else {
                debug!(
                    tier = %source.tier,
                    label = %source.label,
                    path = %source.path.display(),
                    "Env file not found, skipping"
                );
                metrics::inc_sources_missing();
            }

            provenance.tiers.insert(
                source.tier,
                LoadedSource {
                    source: source.clone(),
                    parsed,
                },
            );
        }

        Ok((environment, provenance))
    }

    fn read_source(&self, source: &EnvFileSource) -> Result<ParsedEnvFile, CascadeError> {
        let unreadable = |e: io::Error| CascadeError::SourceUnreadable {
            path: source.path.clone(),
            source: e,
        };

        match self.reader.exists(&source.path) {
            Ok(true) => {}
            Ok(false) => return Ok(ParsedEnvFile::missing()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ParsedEnvFile::missing()),
            Err(e) => return Err(unreadable(e)),
        }

        match self.reader.read_to_string(&source.path) {
            Ok(content) => Ok(ParsedEnvFile::parse(&content)),
            // Removed between the existence check and the read.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ParsedEnvFile::missing()),
            Err(e) => Err(unreadable(e)),
        }
    }
}
