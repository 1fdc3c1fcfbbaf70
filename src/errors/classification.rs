use super::types::DefensisError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Set when the error means the caller misused the API rather than hit a runtime condition.
    pub programming_error: bool,
    pub exit_code: i32,
}

impl DefensisError {
    /// Classify this error for reporting and process exit status.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            DefensisError::InvalidState(_) => ErrorClassification {
                error_type: "InvalidStateError",
                programming_error: true,
                exit_code: 70,
            },
            DefensisError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                programming_error: false,
                exit_code: 2,
            },
            DefensisError::Session(_) => ErrorClassification {
                error_type: "SessionError",
                programming_error: false,
                exit_code: 4,
            },
            DefensisError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                programming_error: false,
                exit_code: 2,
            },
            DefensisError::Io(_) => ErrorClassification {
                error_type: "IoError",
                programming_error: false,
                exit_code: 1,
            },
            DefensisError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                programming_error: false,
                exit_code: 1,
            },
            DefensisError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                programming_error: true,
                exit_code: 1,
            },
        }
    }
}
