//! Configuration Loader
//!
//! Layers an optional configuration file (TOML, YAML or JSON, chosen by
//! extension) under `FLAG_SCOPES__*` environment variables, e.g.
//! `FLAG_SCOPES__EVENT_CHANNEL_CAPACITY=64`.

use super::FlagsConfig;
use crate::error::Result;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "FLAG_SCOPES_CONFIG";

const ENV_PREFIX: &str = "FLAG_SCOPES";
const ENV_SEPARATOR: &str = "__";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with environment auto-detection
    ///
    /// Reads the file named by `FLAG_SCOPES_CONFIG` when set, otherwise
    /// `config/flag_scopes.<ext>` if present.
    pub fn load() -> Result<FlagsConfig> {
        let file = env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        match file {
            Some(path) => Self::load_from_file(&path),
            None => Self::build(None),
        }
    }

    /// Load configuration from a specific file, with environment overrides
    pub fn load_from_file(path: &Path) -> Result<FlagsConfig> {
        Self::build(Some(path))
    }

    fn build(path: Option<&Path>) -> Result<FlagsConfig> {
        let environment = crate::logging::get_environment();

        let mut builder = config::Config::builder()
            .set_default("environment", environment.clone())?;

        builder = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading flag configuration file");
                builder.add_source(config::File::from(path).required(true))
            }
            None => builder.add_source(config::File::with_name("config/flag_scopes").required(false)),
        };

        let config: FlagsConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            environment = %config.environment,
            models = config.models.len(),
            custom_flags = config.custom_flags.len(),
            "Flag configuration loaded"
        );

        Ok(config)
    }
}
