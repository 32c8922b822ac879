use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Request to {endpoint} failed with status {status}: {message}")]
    RequestFailed {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Malformed date '{input}': expected {expected}")]
    MalformedDate { input: String, expected: String },

    #[error("Invalid date {date}: {reason}")]
    InvalidDate { date: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    #[error("User is not an admin! (uid {uid})")]
    NotAuthorized { uid: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Access,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdminError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AdminError::ApiError(_) | AdminError::RequestFailed { .. } => ErrorCategory::Network,
            AdminError::ConfigValidationError { .. }
            | AdminError::InvalidConfigValueError { .. }
            | AdminError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AdminError::InvalidArgument { .. }
            | AdminError::MalformedDate { .. }
            | AdminError::InvalidDate { .. } => ErrorCategory::Input,
            AdminError::AuthenticationError { .. } | AdminError::NotAuthorized { .. } => {
                ErrorCategory::Access
            }
            AdminError::CsvError(_)
            | AdminError::IoError(_)
            | AdminError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Access => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            AdminError::ApiError(e) if e.is_timeout() => {
                "The user API did not answer in time".to_string()
            }
            AdminError::ApiError(_) => "Could not reach the user API".to_string(),
            AdminError::RequestFailed { status, message, .. } => {
                format!("The user API rejected the request ({}): {}", status, message)
            }
            AdminError::NotAuthorized { .. } => "User is not an admin!".to_string(),
            AdminError::AuthenticationError { message } => {
                format!("Error signing in: {}", message)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the API server is running and api.base_url is correct",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::Input => "Check the command arguments; dates use DD/MM/YYYY or YYYY-MM-DD",
            ErrorCategory::Access => "Sign in with an account whose profile role is 'admin'",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
