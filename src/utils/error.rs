use thiserror::Error;

#[derive(Error, Debug)]
pub enum RationError {
    #[error("File not found at '{path}'")]
    MissingFile { path: String },

    #[error("Error reading '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("{kind} ID '{id}' not found.{}", did_you_mean(.suggestions))]
    NotFound {
        kind: RecordKind,
        id: String,
        suggestions: Vec<String>,
    },

    #[error("Invalid diet format '{token}': {reason}. Use 'FeedID:Quantity'.")]
    MalformedInput { token: String, reason: String },

    #[error("{message}")]
    Precondition { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Which reference table an identifier was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Animal,
    Feed,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Animal => write!(f, "Animal"),
            RecordKind::Feed => write!(f, "Feed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ReferenceData,
    Lookup,
    UserInput,
    Configuration,
    System,
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" Did you mean: {}?", suggestions.join(", "))
    }
}

impl RationError {
    pub fn precondition(message: impl Into<String>) -> Self {
        RationError::Precondition {
            message: message.into(),
        }
    }

    pub fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        RationError::MalformedInput {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RationError::MissingFile { .. } | RationError::Parse { .. } => {
                ErrorCategory::ReferenceData
            }
            RationError::CsvError(_) => ErrorCategory::ReferenceData,
            RationError::NotFound { .. } => ErrorCategory::Lookup,
            RationError::MalformedInput { .. } | RationError::Precondition { .. } => {
                ErrorCategory::UserInput
            }
            RationError::ConfigError { .. } | RationError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            RationError::IoError(_) | RationError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("Error: {}", self)
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RationError::MissingFile { .. } => {
                "Check the path, or pass --standards / --feeds explicitly".to_string()
            }
            RationError::Parse { .. } | RationError::CsvError(_) => {
                "Make sure the file is a CSV with the expected header columns".to_string()
            }
            RationError::NotFound { suggestions, .. } if !suggestions.is_empty() => {
                format!("Try one of: {}", suggestions.join(", "))
            }
            RationError::NotFound { kind, .. } => {
                format!("List the {} table to see the available IDs", kind)
            }
            RationError::MalformedInput { .. } => {
                "Write the diet as \"FeedID:Qty,FeedID:Qty\"".to_string()
            }
            RationError::Precondition { .. } => "Adjust the input values".to_string(),
            RationError::ConfigError { .. } | RationError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
            RationError::IoError(_) | RationError::SerializationError(_) => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_lists_suggestions() {
        let err = RationError::NotFound {
            kind: RecordKind::Animal,
            id: "XYZ".to_string(),
            suggestions: vec!["XYZ1".to_string(), "XYZ2".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Animal ID 'XYZ' not found. Did you mean: XYZ1, XYZ2?"
        );
        assert_eq!(err.category(), ErrorCategory::Lookup);
    }

    #[test]
    fn test_not_found_message_without_suggestions() {
        let err = RationError::NotFound {
            kind: RecordKind::Feed,
            id: "Q".to_string(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), "Feed ID 'Q' not found.");
    }

    #[test]
    fn test_malformed_message_echoes_token() {
        let err = RationError::malformed("CORN=50", "expected exactly one ':'");
        assert!(err.to_string().contains("'CORN=50'"));
        assert!(err.user_friendly_message().starts_with("Error: "));
    }
}
