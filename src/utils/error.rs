use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Model API returned {status}: {message}")]
    ModelError { status: u16, message: String },

    #[error("Location lookup failed: {message}")]
    LookupError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::TransportError(_)
            | CheckError::ModelError { .. }
            | CheckError::LookupError { .. } => ErrorCategory::Network,
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CheckError::ValidationError { .. } => ErrorCategory::Input,
            CheckError::SerializationError(_) => ErrorCategory::Data,
            CheckError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者輸入錯誤只影響本次請求
            CheckError::ValidationError { .. } => ErrorSeverity::Low,
            CheckError::TransportError(_)
            | CheckError::ModelError { .. }
            | CheckError::LookupError { .. } => ErrorSeverity::Medium,
            CheckError::SerializationError(_) => ErrorSeverity::High,
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::ConfigValidationError { .. }
            | CheckError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckError::TransportError(_) | CheckError::ModelError { .. } => {
                "The assessment service is unavailable right now. Please try again later."
                    .to_string()
            }
            CheckError::LookupError { .. } => "The location could not be looked up.".to_string(),
            CheckError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            CheckError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            CheckError::ConfigValidationError { field, message } => {
                format!("Invalid configuration ({}): {}", field, message)
            }
            CheckError::ConfigError { message } => format!("Configuration problem: {}", message),
            CheckError::ValidationError { message } => message.clone(),
            CheckError::SerializationError(_) => "Could not encode the result.".to_string(),
            CheckError::IoError(e) => format!("File access failed: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CheckError::TransportError(_) => "Check your network connection and the model base_url",
            CheckError::ModelError { status: 401, .. } | CheckError::ModelError { status: 403, .. } => {
                "Check that OPENAI_API_KEY holds a valid key"
            }
            CheckError::ModelError { .. } => "Wait a moment and submit the idea again",
            CheckError::LookupError { .. } => "Disable [lookup] or check the lookup endpoint",
            CheckError::MissingConfigError { .. } => {
                "Set the value in the config file or the matching environment variable"
            }
            CheckError::InvalidConfigValueError { .. }
            | CheckError::ConfigValidationError { .. }
            | CheckError::ConfigError { .. } => "Fix the config file and run again",
            CheckError::ValidationError { .. } => "Enter a business idea before submitting",
            CheckError::SerializationError(_) => "Re-run with --format text",
            CheckError::IoError(_) => "Check that the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_low_severity() {
        let err = CheckError::ValidationError {
            message: "Please enter an idea!".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.user_friendly_message(), "Please enter an idea!");
    }

    #[test]
    fn test_missing_key_is_critical() {
        let err = CheckError::MissingConfigError {
            field: "model.api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("model.api_key"));
    }

    #[test]
    fn test_model_error_messages_stay_generic() {
        let err = CheckError::ModelError {
            status: 500,
            message: "upstream exploded".to_string(),
        };
        assert!(!err.user_friendly_message().contains("exploded"));
        assert_eq!(err.category(), ErrorCategory::Network);
    }
}
