//! Error types for the tuition office engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur in the record services and engines.

use thiserror::Error;

/// The main error type for the tuition office engine.
///
/// All fallible operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use tuition_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The record store could not be reached. The operator may retry the action.
    #[error("Record store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the connectivity failure.
        message: String,
    },

    /// Input was rejected before reaching the store.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An update targeted a record that does not exist.
    #[error("Record '{id}' not found in collection '{collection}'")]
    RecordNotFound {
        /// The collection that was searched.
        collection: String,
        /// The id that was not found.
        id: String,
    },

    /// A record was asked to move to a state it cannot reach from its current one.
    #[error("Invalid transition for '{id}': {message}")]
    InvalidTransition {
        /// The id of the record.
        id: String,
        /// A description of the rejected transition.
        message: String,
    },

    /// A unique key could not be issued or was already taken.
    #[error("Duplicate key '{key}' in collection '{collection}'")]
    DuplicateKey {
        /// The collection holding the key.
        collection: String,
        /// The conflicting key.
        key: String,
    },

    /// A record could not be converted to or from its stored document.
    #[error("Serialization error: {message}")]
    Serialization {
        /// A description of the serialization failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if the failure is transient and the action may be re-initiated.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::validation("marksObtained", "exceeds maximum of 100");
        assert_eq!(
            error.to_string(),
            "Invalid field 'marksObtained': exceeds maximum of 100"
        );
    }

    #[test]
    fn test_record_not_found_displays_collection_and_id() {
        let error = EngineError::RecordNotFound {
            collection: "staff_salary".to_string(),
            id: "abc".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Record 'abc' not found in collection 'staff_salary'"
        );
    }

    #[test]
    fn test_only_store_unavailable_is_transient() {
        let transient = EngineError::StoreUnavailable {
            message: "offline".to_string(),
        };
        assert!(transient.is_transient());
        assert!(!EngineError::validation("amount", "must be positive").is_transient());
    }

    #[test]
    fn test_serde_error_converts_to_serialization() {
        let parse = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let error: EngineError = parse.into();
        assert!(matches!(error, EngineError::Serialization { .. }));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unavailable() -> EngineResult<()> {
            Err(EngineError::StoreUnavailable {
                message: "timeout".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_unavailable()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
