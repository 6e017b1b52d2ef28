//! Unified error types for the services.

use std::path::PathBuf;

use thiserror::Error;

use crate::cascade::Tier;

/// Unified error type for service startup.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Environment cascade could not be loaded.
    #[error("environment cascade error: {0}")]
    Cascade(#[from] CascadeError),

    /// Configuration extraction from the effective environment failed.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Environment cascade errors.
///
/// A missing source and a malformed line are not errors; both are absorbed by
/// the loader.
#[derive(Error, Debug)]
pub enum CascadeError {
    /// File exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    SourceUnreadable {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Sources were not given in strictly ascending tier order.
    #[error("sources out of order: tier {next} follows tier {previous}")]
    SourcesOutOfOrder {
        /// Tier of the earlier source.
        previous: Tier,
        /// Tier of the offending source.
        next: Tier,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
