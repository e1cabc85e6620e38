use thiserror::Error;

#[derive(Error, Debug)]
pub enum Rg5329Error {
    #[error("Invalid order line #{index}: {reason}")]
    InvalidOrderLine { index: usize, reason: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Remote procedure failed: {message}")]
    RpcError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl Rg5329Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Rg5329Error::InvalidOrderLine { .. }
            | Rg5329Error::SerializationError(_)
            | Rg5329Error::CsvError(_) => ErrorCategory::Input,
            Rg5329Error::ApiError(_) | Rg5329Error::RpcError { .. } => ErrorCategory::Network,
            Rg5329Error::ConfigValidationError { .. }
            | Rg5329Error::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Rg5329Error::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 遠端失敗可重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI. 2 is shared with a fallback outcome.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network)
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Rg5329Error::InvalidOrderLine { index, reason } => {
                format!("Order line #{} cannot be evaluated: {}", index, reason)
            }
            Rg5329Error::ApiError(_) => "Could not reach the ERP server".to_string(),
            Rg5329Error::RpcError { message } => {
                format!("The ERP server rejected the RG5329 request: {}", message)
            }
            Rg5329Error::CsvError(_) => "Failed to write the CSV report".to_string(),
            Rg5329Error::IoError(e) => format!("File system error: {}", e),
            Rg5329Error::SerializationError(_) => {
                "The order snapshot is not valid JSON".to_string()
            }
            Rg5329Error::ConfigValidationError { field, .. }
            | Rg5329Error::InvalidConfigValueError { field, .. } => {
                format!("Configuration problem with '{}': {}", field, self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Rg5329Error::InvalidOrderLine { .. } => {
                "Make sure every line has a product and either price_without_tax or qty and price_unit"
            }
            Rg5329Error::ApiError(_) => "Check the rpc.endpoint setting and network connectivity",
            Rg5329Error::RpcError { .. } => {
                "Save the order in the ERP and confirm the session is still valid"
            }
            Rg5329Error::CsvError(_) | Rg5329Error::IoError(_) => {
                "Check that the paths exist and are writable"
            }
            Rg5329Error::SerializationError(_) => "Re-export the order snapshot from the host",
            Rg5329Error::ConfigValidationError { .. }
            | Rg5329Error::InvalidConfigValueError { .. } => {
                "Fix the TOML configuration file and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Rg5329Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_line_is_high_severity_input() {
        let err = Rg5329Error::InvalidOrderLine {
            index: 2,
            reason: "missing product".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_rpc_error_is_retryable() {
        let err = Rg5329Error::RpcError {
            message: "Session expired".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_retryable());
        assert!(err.user_friendly_message().contains("Session expired"));
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = [
            Rg5329Error::InvalidOrderLine {
                index: 0,
                reason: "amount out of range".to_string(),
            },
            Rg5329Error::RpcError {
                message: "Access Denied".to_string(),
            },
            Rg5329Error::ConfigValidationError {
                field: "rpc.endpoint".to_string(),
                message: "must not be empty".to_string(),
            },
            Rg5329Error::InvalidConfigValueError {
                field: "trigger.debounce_ms".to_string(),
                value: "90000".to_string(),
                reason: "too long".to_string(),
            },
            Rg5329Error::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "order.json")),
        ];

        let codes: Vec<i32> = errors.iter().map(Rg5329Error::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 1, 1, 3]);
        assert!(errors
            .iter()
            .filter(|e| e.category() == ErrorCategory::Configuration)
            .all(|e| e.recovery_suggestion().contains("TOML")));
    }
}
