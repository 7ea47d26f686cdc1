//! Named operation table for flag families.
//!
//! Every family exposes the same six operations under its own names, for
//! example `with_not_published` / `only_archived` / `undo_publish`.

use super::definition::FlagDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagOperation {
    ApplyDefault,
    IncludeOff,
    ExcludeOff,
    OnlyOff,
    SetOn,
    SetOff,
}

impl FlagOperation {
    pub const ALL: [FlagOperation; 6] = [
        FlagOperation::ApplyDefault,
        FlagOperation::IncludeOff,
        FlagOperation::ExcludeOff,
        FlagOperation::OnlyOff,
        FlagOperation::SetOn,
        FlagOperation::SetOff,
    ];

    /// Operations that only reshape a query
    pub fn is_query_modifier(&self) -> bool {
        matches!(
            self,
            FlagOperation::IncludeOff | FlagOperation::ExcludeOff | FlagOperation::OnlyOff
        )
    }

    /// Operations that write the flag column
    pub fn is_mutation(&self) -> bool {
        matches!(self, FlagOperation::SetOn | FlagOperation::SetOff)
    }
}

impl fmt::Display for FlagOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlagOperation::ApplyDefault => "apply_default",
            FlagOperation::IncludeOff => "include_off",
            FlagOperation::ExcludeOff => "exclude_off",
            FlagOperation::OnlyOff => "only_off",
            FlagOperation::SetOn => "set_on",
            FlagOperation::SetOff => "set_off",
        };
        f.write_str(name)
    }
}

impl FlagDefinition {
    /// Public name of `operation` for this family
    pub fn operation_name(&self, operation: FlagOperation) -> String {
        let hidden = &self.verbs.hidden_state;
        match operation {
            FlagOperation::ApplyDefault => self.key.clone(),
            FlagOperation::IncludeOff => format!("with_{hidden}"),
            FlagOperation::ExcludeOff => format!("without_{hidden}"),
            FlagOperation::OnlyOff => format!("only_{hidden}"),
            FlagOperation::SetOn => self.verbs.set.clone(),
            FlagOperation::SetOff => self.verbs.unset.clone(),
        }
    }

    /// Map a family-specific name back to its operation
    pub fn resolve(&self, name: &str) -> Option<FlagOperation> {
        FlagOperation::ALL
            .into_iter()
            .find(|operation| self.operation_name(*operation) == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::families;

    #[test]
    fn test_published_at_names() {
        let def = families::get(families::PUBLISHED_AT).unwrap();
        assert_eq!(
            def.operation_name(FlagOperation::IncludeOff),
            "with_not_published"
        );
        assert_eq!(
            def.operation_name(FlagOperation::ExcludeOff),
            "without_not_published"
        );
        assert_eq!(
            def.operation_name(FlagOperation::OnlyOff),
            "only_not_published"
        );
        assert_eq!(def.operation_name(FlagOperation::SetOn), "publish");
        assert_eq!(def.operation_name(FlagOperation::SetOff), "undo_publish");
    }

    #[test]
    fn test_resolve_round_trips_every_family() {
        for def in families::all() {
            for operation in FlagOperation::ALL {
                let name = def.operation_name(operation);
                assert_eq!(def.resolve(&name), Some(operation), "{}: {name}", def.key);
            }
        }
    }

    #[test]
    fn test_resolve_unknown_name() {
        let def = families::get(families::ARCHIVED_FLAG).unwrap();
        assert_eq!(def.resolve("only_archived"), Some(FlagOperation::OnlyOff));
        assert_eq!(def.resolve("only_published"), None);
    }

    #[test]
    fn test_archive_families_unset_verbs() {
        let archived_at = families::get(families::ARCHIVED_AT).unwrap();
        assert_eq!(archived_at.resolve("unarchive"), Some(FlagOperation::SetOff));
        assert_eq!(archived_at.resolve("undo_archive"), None);

        let archived_flag = families::get(families::ARCHIVED_FLAG).unwrap();
        assert_eq!(archived_flag.resolve("undo_archive"), Some(FlagOperation::SetOff));
    }

    #[test]
    fn test_operation_kinds() {
        assert!(FlagOperation::OnlyOff.is_query_modifier());
        assert!(!FlagOperation::ApplyDefault.is_query_modifier());
        assert!(FlagOperation::SetOff.is_mutation());
        assert!(!FlagOperation::IncludeOff.is_mutation());
    }
}
