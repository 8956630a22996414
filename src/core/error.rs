//! Error types for dbc.
//!
//! Uses thiserror for structured errors. Two categories matter to callers:
//! - Constraint violations: a value broke a validator, carries the message
//! - Structural errors: the spec or the call itself is malformed and no
//!   validation mode can recover from it

use thiserror::Error;

/// Top-level error type for dbc.
///
/// Encompasses engine errors plus the I/O and parsing failures met while
/// loading specs, targets and configuration.
#[derive(Error, Debug)]
pub enum DbcError {
    /// Error from applying a spec.
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    /// Error from loading configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading a spec or target failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding or encoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Errors raised while applying a specification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// A value failed a validator. The message is shown as-is.
    #[error("{0}")]
    Violation(String),

    /// An invocation names a validator absent from the registry.
    #[error("validator '{0}' not found")]
    ValidatorNotFound(String),

    /// The target is undefined or null.
    #[error("no target supplied")]
    MissingTarget,

    /// The spec is undefined or null.
    #[error("no specification supplied")]
    MissingSpec,

    /// `isDbcType`/`isDbcTypes` name an undefined contract type.
    #[error("contract type '{0}' not found")]
    TypeNotFound(String),

    /// An invocation's arguments are malformed.
    #[error("invalid arguments for validator '{validator}': {reason}")]
    InvalidArguments {
        /// Validator name.
        validator: String,
        /// What was wrong.
        reason: String,
    },

    /// Spec data does not have the spec shape.
    #[error("invalid specification: {0}")]
    InvalidSpec(String),

    /// Nested spec application went deeper than the engine allows.
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read {path}: {error}")]
    Read {
        /// File path.
        path: String,
        /// Underlying I/O error.
        error: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting has an unusable value.
    #[error("Invalid engine setting '{setting}': {reason}")]
    InvalidSetting {
        /// Dotted setting name.
        setting: String,
        /// What was wrong.
        reason: String,
    },
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ContractError {
    /// Build an argument error for a validator.
    pub fn invalid_arguments(validator: &str, reason: impl Into<String>) -> Self {
        ContractError::InvalidArguments {
            validator: validator.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this is an ordinary constraint violation.
    pub fn is_violation(&self) -> bool {
        matches!(self, ContractError::Violation(_))
    }

    /// Whether this error signals a malformed spec or call.
    pub fn is_structural(&self) -> bool {
        !self.is_violation()
    }

    /// The violation message, if this is a violation.
    pub fn message(&self) -> Option<&str> {
        match self {
            ContractError::Violation(message) => Some(message),
            _ => None,
        }
    }

    /// Prefix a violation message with caller context.
    ///
    /// Structural errors pass through unchanged.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            ContractError::Violation(message) if !context.is_empty() => {
                ContractError::Violation(format!("{}: {}", context, message))
            }
            other => other,
        }
    }
}

/// Result type alias for engine operations.
pub type ContractResult<T> = Result<T, ContractError>;

/// Result type alias for dbc operations.
pub type DbcResult<T> = Result<T, DbcError>;
