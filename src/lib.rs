//! Api and worker HTTP services backed by a tiered `.env` cascade.
//!
//! Each service assembles its environment from up to three definition files,
//! lowest precedence first:
//!
//! ```text
//! <root>/.env.base                                  base
//! <root>/apps/<service>/.env                        service-specific
//! <context>/.dual/.local/service/<service>/.env     context-override (optional)
//! ```
//!
//! A later file overrides an earlier one, and any file overrides the inherited
//! process environment. The loader keeps the names each file defined so the
//! root endpoint can report where a value came from.
//!
//! # Modules
//!
//! - [`cascade`]: Env file parsing, precedence, and provenance
//! - [`service`]: Service names and env file layout
//! - [`config`]: Configuration read from the resolved environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP endpoints
//! - [`metrics`]: Prometheus counters
//! - [`utils`]: Utility functions

pub mod api;
pub mod cascade;
pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod utils;

pub use config::Config;
pub use error::{CascadeError, Result, ServiceError};
