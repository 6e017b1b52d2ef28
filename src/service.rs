//! Service identity and the on-disk layout of its env files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use strum::{Display, EnumString};

use crate::cascade::{EffectiveEnvironment, EnvCascadeLoader, EnvFileSource, Provenance, SourceReader};
use crate::config::Config;

/// File name of the shared base tier, relative to the root.
pub const BASE_ENV_FILE: &str = ".env.base";

/// Directory holding one subdirectory per service, relative to the root.
pub const APPS_DIR: &str = "apps";

/// File name of a service tier inside its service directory.
pub const SERVICE_ENV_FILE: &str = ".env";

/// Directory of per-service overrides, relative to the context root.
pub const CONTEXT_OVERRIDE_DIR: &str = ".dual/.local/service";

/// Which of the two services is running.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, Default,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceName {
    /// Public API service.
    #[default]
    Api,
    /// Background worker service.
    Worker,
}

impl ServiceName {
    /// Port used when neither `--port` nor `PORT` is set.
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceName::Api => 3001,
            ServiceName::Worker => 3002,
        }
    }

    /// Directory name of the service under `apps/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ServiceName::Api => "api",
            ServiceName::Worker => "worker",
        }
    }
}

/// Where a service finds its env files.
#[derive(Debug, Clone)]
pub struct ServiceLayout {
    /// Installation root holding `.env.base` and `apps/`.
    pub root: PathBuf,
    /// Service being started.
    pub service: ServiceName,
    /// Parent repository holding local overrides, if any.
    pub context_root: Option<PathBuf>,
}

impl ServiceLayout {
    /// Layout rooted at `root`. Relative roots are resolved against the
    /// current directory.
    pub fn new(root: impl AsRef<Path>, service: ServiceName) -> std::io::Result<Self> {
        Ok(Self {
            root: absolutize(root.as_ref())?,
            service,
            context_root: None,
        })
    }

    /// Add the context-override tier.
    pub fn with_context_root(mut self, context_root: impl AsRef<Path>) -> std::io::Result<Self> {
        self.context_root = Some(absolutize(context_root.as_ref())?);
        Ok(self)
    }

    /// Path of the base tier file.
    pub fn base_file(&self) -> PathBuf {
        self.root.join(BASE_ENV_FILE)
    }

    /// Path of the service tier file.
    pub fn service_file(&self) -> PathBuf {
        self.root
            .join(APPS_DIR)
            .join(self.service.dir_name())
            .join(SERVICE_ENV_FILE)
    }

    /// Path of the context-override file, if a context root is set.
    pub fn context_file(&self) -> Option<PathBuf> {
        self.context_root.as_ref().map(|root| {
            root.join(CONTEXT_OVERRIDE_DIR)
                .join(self.service.dir_name())
                .join(SERVICE_ENV_FILE)
        })
    }

    /// Sources in ascending tier order.
    pub fn sources(&self) -> Vec<EnvFileSource> {
        let mut sources = vec![
            EnvFileSource::base(self.base_file()),
            EnvFileSource::service(self.service_file()),
        ];
        if let Some(context) = self.context_file() {
            sources.push(EnvFileSource::context(context));
        }
        sources
    }
}

/// A service's resolved environment, ready to serve.
#[derive(Debug)]
pub struct LoadedService {
    /// Environment after the cascade was applied.
    pub environment: EffectiveEnvironment,
    /// Names defined per tier.
    pub provenance: Provenance,
    /// Configuration extracted from `environment`.
    pub config: Config,
}

impl ServiceLayout {
    /// Apply this layout's sources over `inherited` and extract the configuration.
    pub fn load<R: SourceReader>(
        &self,
        loader: &EnvCascadeLoader<R>,
        inherited: EffectiveEnvironment,
    ) -> crate::Result<LoadedService> {
        let (environment, provenance) = loader.load(&self.sources(), inherited)?;
        let config = Config::from_environment(&environment)?;

        Ok(LoadedService {
            environment,
            provenance,
            config,
        })
    }
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
