//! Process-wide startup for the entity decoding layer.

use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;

use crate::export::write_class_definitions;
use crate::registry::{ConfigurationError, EntityClassRegistry};

#[derive(Debug, Error)]
pub enum InitError {
    #[error("Entity class configuration error: {0}")]
    Config(#[from] ConfigurationError),

    #[error("Failed to write class definitions: {0}")]
    Export(#[from] io::Error),
}

/// Startup options.
#[derive(Debug, Clone, Default)]
pub struct InitConfig {
    /// Where to write the JSON class definition export, if anywhere
    pub export_classes_path: Option<PathBuf>,
}

static REGISTRY: OnceLock<Result<EntityClassRegistry, ConfigurationError>> = OnceLock::new();

/// The process-wide class registry, built on first use.
///
/// Both outcomes are cached: a configuration error keeps being reported on
/// every later call without rebuilding.
pub fn registry() -> Result<&'static EntityClassRegistry, ConfigurationError> {
    REGISTRY
        .get_or_init(EntityClassRegistry::build)
        .as_ref()
        .map_err(ConfigurationError::clone)
}

/// Initialize the decoding layer eagerly.
///
/// Builds (or reuses) the process-wide registry and optionally writes the
/// class definition export. Decoding works without calling this; it exists
/// to surface configuration errors at startup and to drive the export.
pub fn init(config: &InitConfig) -> Result<&'static EntityClassRegistry, InitError> {
    let registry = registry()?;

    if let Some(path) = &config.export_classes_path {
        write_class_definitions(registry, path)?;
    }

    Ok(registry)
}
