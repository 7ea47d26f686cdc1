//! # Configuration
//!
//! Declarative description of the flagged models an application uses. A
//! [`FlagsConfig`] names models, their tables and the flag families attached
//! to them; [`FlagsConfig::build_registry`] turns it into a [`ModelRegistry`].
//!
//! ```toml
//! event_channel_capacity = 256
//!
//! [[models]]
//! name = "Post"
//! table = "posts"
//! flags = ["published_at_scope", "archived_flag_scope"]
//!
//! [models.hooks]
//! should_apply_archived_flag_scope = true
//! ```

pub mod loader;

pub use loader::ConfigLoader;

use crate::error::{FlagError, Result};
use crate::events::EventPublisher;
use crate::flag::{families, FlagDefinition};
use crate::models::ModelDescriptor;
use crate::registry::ModelRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagsConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Buffer size of the flag event broadcast channel
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
    /// Filter directive overriding the environment's default log level
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub json_logs: bool,
    #[serde(default)]
    pub database_url: Option<String>,
    /// Families beyond the built-in catalog
    #[serde(default)]
    pub custom_flags: Vec<FlagDefinition>,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

/// One flagged model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub table: String,
    #[serde(default = "default_created_at_column")]
    pub created_at_column: String,
    /// Family keys, resolved against `custom_flags` first, then the catalog
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub hooks: BTreeMap<String, bool>,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_event_channel_capacity() -> usize {
    1000
}

fn default_created_at_column() -> String {
    "created_at".to_string()
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            event_channel_capacity: default_event_channel_capacity(),
            log_level: None,
            json_logs: false,
            database_url: None,
            custom_flags: Vec::new(),
            models: Vec::new(),
        }
    }
}

impl FlagsConfig {
    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(FlagError::Configuration(
                "event_channel_capacity must be greater than 0".to_string(),
            ));
        }

        let mut custom_keys = HashSet::new();
        for flag in &self.custom_flags {
            flag.validate()?;
            if families::get(&flag.key).is_some() {
                return Err(FlagError::invalid_definition(
                    &flag.key,
                    "key collides with a built-in family",
                ));
            }
            if !custom_keys.insert(flag.key.as_str()) {
                return Err(FlagError::invalid_definition(
                    &flag.key,
                    "key is defined more than once",
                ));
            }
        }

        let mut model_names = HashSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(FlagError::Configuration(
                    "model name must not be empty".to_string(),
                ));
            }
            if !model_names.insert(model.name.as_str()) {
                return Err(FlagError::DuplicateModel(model.name.clone()));
            }
            if !crate::flag::definition::is_identifier(&model.table) {
                return Err(FlagError::Configuration(format!(
                    "model '{}' has invalid table name '{}'",
                    model.name, model.table
                )));
            }
            for key in &model.flags {
                self.resolve_flag(key).ok_or_else(|| FlagError::UnknownFlag {
                    model: model.name.clone(),
                    flag: key.clone(),
                })?;
            }
        }

        Ok(())
    }

    /// Definition for a family key
    pub fn resolve_flag(&self, key: &str) -> Option<&FlagDefinition> {
        self.custom_flags
            .iter()
            .find(|flag| flag.key == key)
            .or_else(|| families::get(key))
    }

    /// Descriptor for one configured model
    pub fn descriptor(&self, model: &ModelConfig) -> Result<ModelDescriptor> {
        let mut descriptor = ModelDescriptor::new(&model.name, &model.table)
            .with_created_at_column(&model.created_at_column);

        for key in &model.flags {
            let flag = self.resolve_flag(key).ok_or_else(|| FlagError::UnknownFlag {
                model: model.name.clone(),
                flag: key.clone(),
            })?;
            descriptor = descriptor.with_flag(flag.clone());
        }

        for (hook, value) in &model.hooks {
            descriptor = descriptor.with_hook(hook, *value);
        }

        Ok(descriptor)
    }

    /// Validate and register every configured model
    pub fn build_registry(&self) -> Result<ModelRegistry> {
        self.validate()?;

        let registry = ModelRegistry::new();
        for model in &self.models {
            registry.register(self.descriptor(model)?)?;
        }
        Ok(registry)
    }

    /// Event publisher sized by `event_channel_capacity`
    pub fn event_publisher(&self) -> EventPublisher {
        EventPublisher::new(self.event_channel_capacity)
    }

    /// Log filter directive: explicit `log_level`, else the environment default
    pub fn effective_log_level(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| crate::logging::get_log_level(&self.environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::{FlagVerbs, OverrideHook, Polarity, Representation};

    fn post_config() -> ModelConfig {
        ModelConfig {
            name: "Post".to_string(),
            table: "posts".to_string(),
            created_at_column: default_created_at_column(),
            flags: vec![
                families::PUBLISHED_AT.to_string(),
                families::ARCHIVED_FLAG.to_string(),
            ],
            hooks: BTreeMap::from([("should_apply_archived_flag_scope".to_string(), true)]),
        }
    }

    fn pinned_flag() -> FlagDefinition {
        FlagDefinition::new(
            "pinned_flag_scope",
            "is_pinned",
            Representation::Boolean,
            Polarity::Normal,
            FlagVerbs::new("pin", "unpin")
                .events("pinned", "unpinned")
                .predicates("is_pinned", "is_unpinned")
                .hidden_state("unpinned"),
            OverrideHook::OptOut("should_apply_pinned_flag_scope".to_string()),
        )
    }

    #[test]
    fn test_build_registry() {
        let config = FlagsConfig {
            models: vec![post_config()],
            ..FlagsConfig::default()
        };

        let registry = config.build_registry().unwrap();
        let post = registry.get("Post").unwrap();
        assert_eq!(post.flags.len(), 2);
        // published_at_scope is opt-in and the hook is not declared
        assert_eq!(
            post.scope().query().build_sql(),
            "SELECT * FROM posts WHERE is_archived IS NOT TRUE"
        );
    }

    #[test]
    fn test_custom_flags_resolve_first() {
        let mut model = post_config();
        model.flags.push("pinned_flag_scope".to_string());
        let config = FlagsConfig {
            custom_flags: vec![pinned_flag()],
            models: vec![model],
            ..FlagsConfig::default()
        };

        let registry = config.build_registry().unwrap();
        assert!(registry
            .get("Post")
            .unwrap()
            .flag("pinned_flag_scope")
            .is_some());
    }

    #[test]
    fn test_validation_failures() {
        let config = FlagsConfig {
            event_channel_capacity: 0,
            ..FlagsConfig::default()
        };
        assert!(matches!(config.validate(), Err(FlagError::Configuration(_))));

        let mut model = post_config();
        model.flags.push("pinned_flag_scope".to_string());
        let config = FlagsConfig {
            models: vec![model],
            ..FlagsConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FlagError::UnknownFlag {
                model: "Post".to_string(),
                flag: "pinned_flag_scope".to_string()
            }
        );

        let config = FlagsConfig {
            models: vec![post_config(), post_config()],
            ..FlagsConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FlagError::DuplicateModel("Post".to_string())
        );

        let mut shadowing = pinned_flag();
        shadowing.key = families::KEPT_FLAG.to_string();
        let config = FlagsConfig {
            custom_flags: vec![shadowing],
            ..FlagsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FlagError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_effective_log_level() {
        let mut config = FlagsConfig::default();
        assert_eq!(config.effective_log_level(), "debug");
        config.log_level = Some("flag_scopes=trace".to_string());
        assert_eq!(config.effective_log_level(), "flag_scopes=trace");
    }
}
