//! Environment cascade: tiered `.env` files applied over an owned environment.
//!
//! This module handles:
//! - Source descriptors and tier ranks
//! - Parsing flat `NAME=VALUE` files
//! - Applying sources in tier order and recording provenance

pub mod environment;
pub mod loader;
pub mod parser;
pub mod source;

pub use environment::{EffectiveEnvironment, EnvLookup};
pub use loader::{EnvCascadeLoader, FsReader, LoadedSource, Provenance, SourceReader};
pub use parser::ParsedEnvFile;
pub use source::{EnvFileSource, Tier};
