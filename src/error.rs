/*!
 * Error Handling for the gnupg-keyring crate
 *
 * Every failure carries a numeric error code, the operation it came from and
 * a free-form context map (key id, exit code, ...) so callers can log or
 * retry meaningfully.
 */

use std::collections::HashMap;
use thiserror::Error;

/// Error type for all key-management operations
#[derive(Debug, Error)]
pub enum GnupgError {
    #[error("Invalid parameter: {parameter} - {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("gpg process failed during {operation}: {cause}")]
    ProcessError {
        operation: String,
        cause: String,
        exit_code: Option<i32>,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Protocol error during {operation}: expected {expected} - {cause}")]
    ProtocolError {
        operation: String,
        expected: String,
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Unable to import key: {cause}")]
    ImportFailed {
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Authentication failed during {operation}: {cause}")]
    AuthenticationError {
        operation: String,
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Configuration error: {setting} - {cause}")]
    ConfigurationError {
        setting: String,
        cause: String,
        error_code: u32,
    },
}

/// Error code constants for different error categories
pub mod error_codes {
    // Parameter errors: 1000-1999
    pub const INVALID_KEY_LENGTH: u32 = 1001;
    pub const INVALID_FIELD_VALUE: u32 = 1002;
    pub const INVALID_KEY_SELECTOR: u32 = 1003;
    pub const MISSING_USER_ID: u32 = 1004;
    pub const EMPTY_KEY_LIST: u32 = 1005;

    // Process errors: 2000-2999
    pub const PROCESS_SPAWN_FAILED: u32 = 2001;
    pub const PROCESS_STDIN_FAILED: u32 = 2002;
    pub const PROCESS_EXIT_FAILURE: u32 = 2003;
    pub const PROCESS_IO_FAILED: u32 = 2004;
    pub const NOTHING_EXPORTED: u32 = 2005;

    // Protocol errors: 3000-3999
    pub const STATUS_RECORD_MISSING: u32 = 3001;
    pub const STATUS_RECORD_MALFORMED: u32 = 3002;
    pub const KEY_NOT_CREATED: u32 = 3003;
    pub const OUTPUT_NOT_ARMORED: u32 = 3004;
    pub const OUTPUT_NOT_UTF8: u32 = 3005;

    // Import errors: 4000-4999
    pub const IMPORT_NO_KEY: u32 = 4001;

    // Authentication errors: 5000-5999
    pub const BAD_PASSPHRASE: u32 = 5001;

    // Configuration errors: 6000-6999
    pub const BINARY_NOT_FOUND: u32 = 6001;
    pub const HOMEDIR_UNRESOLVED: u32 = 6002;
}

impl GnupgError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            GnupgError::InvalidParameter { error_code, .. } => *error_code,
            GnupgError::ProcessError { error_code, .. } => *error_code,
            GnupgError::ProtocolError { error_code, .. } => *error_code,
            GnupgError::ImportFailed { error_code, .. } => *error_code,
            GnupgError::AuthenticationError { error_code, .. } => *error_code,
            GnupgError::ConfigurationError { error_code, .. } => *error_code,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            GnupgError::InvalidParameter { .. } => "InvalidParameter",
            GnupgError::ProcessError { .. } => "ProcessError",
            GnupgError::ProtocolError { .. } => "ProtocolError",
            GnupgError::ImportFailed { .. } => "ImportFailed",
            GnupgError::AuthenticationError { .. } => "AuthenticationError",
            GnupgError::ConfigurationError { .. } => "ConfigurationError",
        }
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            GnupgError::InvalidParameter {
                parameter,
                expected,
                ..
            } => {
                format!(
                    "Invalid parameter '{}'. Expected {}.",
                    parameter, expected
                )
            }
            GnupgError::ProcessError { operation, .. } => {
                format!("The gpg process failed while running '{}'.", operation)
            }
            GnupgError::ProtocolError { operation, .. } => {
                format!(
                    "gpg finished '{}' but did not report the expected result.",
                    operation
                )
            }
            GnupgError::ImportFailed { .. } => {
                "The key material could not be imported into the keyring.".to_string()
            }
            GnupgError::AuthenticationError { .. } => {
                "The passphrase was rejected. Check the current passphrase and try again."
                    .to_string()
            }
            GnupgError::ConfigurationError { setting, .. } => {
                format!("gpg is not configured correctly: {}.", setting)
            }
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            GnupgError::InvalidParameter {
                parameter,
                expected,
                actual,
                ..
            } => {
                details.insert("parameter".to_string(), parameter.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            GnupgError::ProcessError {
                operation,
                cause,
                exit_code,
                context,
                ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("cause".to_string(), cause.clone());
                if let Some(code) = exit_code {
                    details.insert("exit_code".to_string(), code.to_string());
                }
                details.extend(context.clone());
            }
            GnupgError::ProtocolError {
                operation,
                expected,
                cause,
                context,
                ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            GnupgError::ImportFailed { cause, context, .. } => {
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            GnupgError::AuthenticationError {
                operation,
                cause,
                context,
                ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            GnupgError::ConfigurationError { setting, cause, .. } => {
                details.insert("setting".to_string(), setting.clone());
                details.insert("cause".to_string(), cause.clone());
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            GnupgError::InvalidParameter { error_code, .. } => match *error_code {
                error_codes::INVALID_KEY_LENGTH => {
                    Some("Use a supported key length (1024 or 2048 bits).".to_string())
                }
                error_codes::INVALID_KEY_SELECTOR => Some(
                    "Pass a key id or fingerprint without spaces or a leading '-'.".to_string(),
                ),
                _ => None,
            },
            GnupgError::ProcessError { error_code, .. } => match *error_code {
                error_codes::PROCESS_SPAWN_FAILED => Some(
                    "Check that gpg is installed or point GNUPG_BIN at the executable."
                        .to_string(),
                ),
                error_codes::NOTHING_EXPORTED => {
                    Some("Check that the key exists in the configured home directory.".to_string())
                }
                _ => Some("Inspect the gpg diagnostics attached to this error.".to_string()),
            },
            GnupgError::AuthenticationError { .. } => {
                Some("Retry with the correct current passphrase.".to_string())
            }
            GnupgError::ConfigurationError { error_code, .. } => match *error_code {
                error_codes::BINARY_NOT_FOUND => {
                    Some("Install gpg or set GNUPG_BIN to its path.".to_string())
                }
                _ => Some("Configure an explicit home directory.".to_string()),
            },
            _ => None,
        }
    }

    /// Attach a context entry (e.g. the key id) to errors that carry context
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        match &mut self {
            GnupgError::ProcessError { context, .. }
            | GnupgError::ProtocolError { context, .. }
            | GnupgError::ImportFailed { context, .. }
            | GnupgError::AuthenticationError { context, .. } => {
                context.insert(key.to_string(), value.to_string());
            }
            GnupgError::InvalidParameter { .. } | GnupgError::ConfigurationError { .. } => {}
        }
        self
    }

    /// Look up a context entry previously attached with [`with_context`](Self::with_context)
    pub fn context_value(&self, key: &str) -> Option<&str> {
        match self {
            GnupgError::ProcessError { context, .. }
            | GnupgError::ProtocolError { context, .. }
            | GnupgError::ImportFailed { context, .. }
            | GnupgError::AuthenticationError { context, .. } => {
                context.get(key).map(String::as_str)
            }
            GnupgError::InvalidParameter { .. } | GnupgError::ConfigurationError { .. } => None,
        }
    }
}

/// Convenience constructors for common error types
impl GnupgError {
    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str, error_code: u32) -> Self {
        GnupgError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code,
        }
    }

    pub fn process_error(operation: &str, cause: &str, error_code: u32) -> Self {
        GnupgError::ProcessError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            exit_code: None,
            error_code,
            context: HashMap::new(),
        }
    }

    pub fn process_exit(operation: &str, exit_code: Option<i32>, diagnostics: &str) -> Self {
        let cause = match exit_code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        let mut context = HashMap::new();
        if !diagnostics.is_empty() {
            context.insert("diagnostics".to_string(), diagnostics.to_string());
        }

        GnupgError::ProcessError {
            operation: operation.to_string(),
            cause,
            exit_code,
            error_code: error_codes::PROCESS_EXIT_FAILURE,
            context,
        }
    }

    pub fn protocol_error(operation: &str, expected: &str, cause: &str, error_code: u32) -> Self {
        GnupgError::ProtocolError {
            operation: operation.to_string(),
            expected: expected.to_string(),
            cause: cause.to_string(),
            error_code,
            context: HashMap::new(),
        }
    }

    pub fn import_failed(cause: &str) -> Self {
        GnupgError::ImportFailed {
            cause: cause.to_string(),
            error_code: error_codes::IMPORT_NO_KEY,
            context: HashMap::new(),
        }
    }

    pub fn authentication_error(operation: &str, cause: &str) -> Self {
        GnupgError::AuthenticationError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code: error_codes::BAD_PASSPHRASE,
            context: HashMap::new(),
        }
    }

    pub fn configuration_error(setting: &str, cause: &str, error_code: u32) -> Self {
        GnupgError::ConfigurationError {
            setting: setting.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }
}

/// Result type alias for key-management operations
pub type GnupgResult<T> = Result<T, GnupgError>;
