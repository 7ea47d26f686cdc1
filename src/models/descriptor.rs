use super::Record;
use crate::error::{FlagError, Result};
use crate::flag::FlagDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the flag layer needs to know about a model type
pub trait ModelMetadata: Send + Sync {
    fn model_name(&self) -> &str;

    fn table_name(&self) -> &str;

    /// Value of the named override hook, or `None` when the model does not
    /// declare it. An undeclared hook is a normal configuration state.
    fn declared_hook(&self, hook: &str) -> Option<bool>;
}

/// Registered description of a flagged model type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub table: String,
    #[serde(default = "default_created_at_column")]
    pub created_at_column: String,
    #[serde(default)]
    pub flags: Vec<FlagDefinition>,
    #[serde(default)]
    pub hooks: BTreeMap<String, bool>,
}

fn default_created_at_column() -> String {
    "created_at".to_string()
}

impl ModelDescriptor {
    pub fn new(name: &str, table: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            created_at_column: default_created_at_column(),
            flags: Vec::new(),
            hooks: BTreeMap::new(),
        }
    }

    /// Attach a flag family to the model
    pub fn with_flag(mut self, definition: FlagDefinition) -> Self {
        if !self.flags.iter().any(|flag| flag.key == definition.key) {
            self.flags.push(definition);
        }
        self
    }

    /// Declare an override hook with a fixed answer
    pub fn with_hook(mut self, hook: &str, value: bool) -> Self {
        self.hooks.insert(hook.to_string(), value);
        self
    }

    pub fn with_created_at_column(mut self, column: &str) -> Self {
        self.created_at_column = column.to_string();
        self
    }

    /// Flag attached under `key`
    pub fn flag(&self, key: &str) -> Option<&FlagDefinition> {
        self.flags.iter().find(|flag| flag.key == key)
    }

    /// Evaluate a named state predicate such as `is_archived` against a
    /// record, using the first attached flag that defines it
    pub fn evaluate(&self, predicate: &str, record: &Record) -> Result<bool> {
        self.flags
            .iter()
            .find_map(|flag| flag.evaluate(predicate, record))
            .ok_or_else(|| FlagError::UnknownOperation {
                model: self.name.clone(),
                operation: predicate.to_string(),
            })
    }
}

impl ModelMetadata for ModelDescriptor {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn table_name(&self) -> &str {
        &self.table
    }

    fn declared_hook(&self, hook: &str) -> Option<bool> {
        self.hooks.get(hook).copied()
    }
}
