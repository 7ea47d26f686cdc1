//! # Flag Definitions
//!
//! A [`FlagDefinition`] describes one flag family: which column holds the flag,
//! how it is stored, which state is visible by default and what the family's
//! verbs are called. Everything else (predicates, mutation values, operation
//! names) is derived from it.

use crate::error::{FlagError, Result};
use crate::models::ColumnValue;
use crate::query_builder::Condition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the flag is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// `BOOLEAN NOT NULL DEFAULT FALSE`
    Boolean,
    /// `TIMESTAMPTZ NULL`, on when a timestamp is present
    NullableTimestamp,
}

/// Which flag state the default filter keeps visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Rows with the flag on are visible (active, published, ...)
    Normal,
    /// Rows with the flag off are visible (archived, closed, ...)
    Inverse,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Normal => write!(f, "normal"),
            Polarity::Inverse => write!(f, "inverse"),
        }
    }
}

/// Per-model switch for the default filter
///
/// Families disagree on what an undeclared hook means, so each family states
/// its own policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "policy", content = "name", rename_all = "snake_case")]
pub enum OverrideHook {
    /// No hook: the default filter is always applied
    None,
    /// Applied unless the model declares the hook and it returns `false`
    OptOut(String),
    /// Skipped unless the model declares the hook and it returns `true`
    OptIn(String),
}

impl OverrideHook {
    pub fn name(&self) -> Option<&str> {
        match self {
            OverrideHook::None => None,
            OverrideHook::OptOut(name) | OverrideHook::OptIn(name) => Some(name),
        }
    }

    /// Decide whether the default filter applies given the model's declared
    /// hook value (`None` when the model does not declare the hook).
    pub fn should_apply(&self, declared: Option<bool>) -> bool {
        match self {
            OverrideHook::None => true,
            OverrideHook::OptOut(_) => declared.unwrap_or(true),
            OverrideHook::OptIn(_) => declared.unwrap_or(false),
        }
    }
}

/// Names a flag family exposes for its verbs, events and state predicates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagVerbs {
    /// Verb writing the on value (`publish`, `archive`)
    pub set: String,
    /// Verb writing the off value (`undo_publish`, `undo_archive`)
    pub unset: String,
    /// Event published after a single record is turned on (`published`)
    pub set_event: String,
    /// Event published after a single record is turned off (`unpublished`)
    pub unset_event: String,
    /// Record predicate for the on state (`is_published`)
    pub on_predicate: String,
    /// Record predicate for the off state (`is_unpublished`)
    pub off_predicate: String,
    /// Label of the state hidden by the default filter, used in
    /// `with_*` / `without_*` / `only_*` modifier names
    pub hidden_state: String,
}

impl FlagVerbs {
    pub fn new(set: &str, unset: &str) -> Self {
        Self {
            set: set.to_string(),
            unset: unset.to_string(),
            set_event: String::new(),
            unset_event: String::new(),
            on_predicate: String::new(),
            off_predicate: String::new(),
            hidden_state: String::new(),
        }
    }

    pub fn events(mut self, set_event: &str, unset_event: &str) -> Self {
        self.set_event = set_event.to_string();
        self.unset_event = unset_event.to_string();
        self
    }

    pub fn predicates(mut self, on: &str, off: &str) -> Self {
        self.on_predicate = on.to_string();
        self.off_predicate = off.to_string();
        self
    }

    pub fn hidden_state(mut self, label: &str) -> Self {
        self.hidden_state = label.to_string();
        self
    }
}

/// Immutable description of a flag family
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagDefinition {
    /// Unique family key, also the tag of the default scope
    pub key: String,
    /// Column holding the flag
    pub attribute: String,
    pub representation: Representation,
    pub polarity: Polarity,
    pub verbs: FlagVerbs,
    pub override_hook: OverrideHook,
}

impl FlagDefinition {
    pub fn new(
        key: &str,
        attribute: &str,
        representation: Representation,
        polarity: Polarity,
        verbs: FlagVerbs,
        override_hook: OverrideHook,
    ) -> Self {
        Self {
            key: key.to_string(),
            attribute: attribute.to_string(),
            representation,
            polarity,
            verbs,
            override_hook,
        }
    }

    /// Check the definition is usable: names present, verbs distinct and the
    /// attribute a plain SQL identifier
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("key", &self.key),
            ("attribute", &self.attribute),
            ("set verb", &self.verbs.set),
            ("unset verb", &self.verbs.unset),
            ("set event", &self.verbs.set_event),
            ("unset event", &self.verbs.unset_event),
            ("on predicate", &self.verbs.on_predicate),
            ("off predicate", &self.verbs.off_predicate),
            ("hidden state label", &self.verbs.hidden_state),
        ];
        for (what, value) in required {
            if value.trim().is_empty() {
                return Err(FlagError::invalid_definition(
                    &self.key,
                    format!("{what} must not be empty"),
                ));
            }
        }

        if self.verbs.set == self.verbs.unset {
            return Err(FlagError::invalid_definition(
                &self.key,
                "set and unset verbs must differ",
            ));
        }

        if self.verbs.on_predicate == self.verbs.off_predicate {
            return Err(FlagError::invalid_definition(
                &self.key,
                "on and off predicates must differ",
            ));
        }

        if !is_identifier(&self.attribute) {
            return Err(FlagError::invalid_definition(
                &self.key,
                format!("attribute '{}' is not a valid column name", self.attribute),
            ));
        }

        if let Some(hook) = self.override_hook.name() {
            if hook.trim().is_empty() {
                return Err(FlagError::invalid_definition(
                    &self.key,
                    "override hook name must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Value written when the flag is turned on
    pub fn on_value(&self, now: DateTime<Utc>) -> ColumnValue {
        match self.representation {
            Representation::Boolean => ColumnValue::Bool(true),
            Representation::NullableTimestamp => ColumnValue::Timestamp(now),
        }
    }

    /// Value written when the flag is turned off
    pub fn off_value(&self) -> ColumnValue {
        match self.representation {
            Representation::Boolean => ColumnValue::Bool(false),
            Representation::NullableTimestamp => ColumnValue::Null,
        }
    }

    /// Predicate selecting rows with the flag on
    pub fn on_condition(&self) -> Condition {
        match self.representation {
            Representation::Boolean => Condition::eq(&self.attribute, true),
            Representation::NullableTimestamp => Condition::is_not_null(&self.attribute),
        }
    }

    /// Predicate selecting rows with the flag off. A NULL boolean counts as
    /// off so that on and off always partition the table.
    pub fn off_condition(&self) -> Condition {
        match self.representation {
            Representation::Boolean => Condition::is_not_true(&self.attribute),
            Representation::NullableTimestamp => Condition::is_null(&self.attribute),
        }
    }

    /// Predicate of the default filter
    pub fn default_condition(&self) -> Condition {
        match self.polarity {
            Polarity::Normal => self.on_condition(),
            Polarity::Inverse => self.off_condition(),
        }
    }

    /// Predicate selecting the rows the default filter hides
    pub fn complement_condition(&self) -> Condition {
        match self.polarity {
            Polarity::Normal => self.off_condition(),
            Polarity::Inverse => self.on_condition(),
        }
    }

    /// True when turning the flag on makes a row visible by default
    pub fn visible_when_on(&self) -> bool {
        self.polarity == Polarity::Normal
    }

    /// PostgreSQL column definition for the flag
    pub fn column_ddl(&self) -> String {
        match self.representation {
            Representation::Boolean => {
                format!("{} BOOLEAN NOT NULL DEFAULT FALSE", self.attribute)
            }
            Representation::NullableTimestamp => {
                format!("{} TIMESTAMPTZ NULL DEFAULT NULL", self.attribute)
            }
        }
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
