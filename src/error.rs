use thiserror::Error;

/// Errors raised by the flag layer itself.
///
/// Store failures never pass through this type: they are returned unchanged as
/// the store's own `RecordStore::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid flag definition '{key}': {reason}")]
    InvalidDefinition { key: String, reason: String },

    #[error("Unknown flag '{flag}' on model '{model}'")]
    UnknownFlag { model: String, flag: String },

    #[error("Unknown operation '{operation}' on model '{model}'")]
    UnknownOperation { model: String, operation: String },

    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    #[error("Model '{0}' is already registered")]
    DuplicateModel(String),
}

impl FlagError {
    pub fn invalid_definition(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for FlagError {
    fn from(err: config::ConfigError) -> Self {
        FlagError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FlagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlagError::UnknownFlag {
            model: "Post".to_string(),
            flag: "kept_flag_scope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown flag 'kept_flag_scope' on model 'Post'"
        );

        let err = FlagError::invalid_definition("custom", "attribute must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid flag definition 'custom': attribute must not be empty"
        );
    }
}
