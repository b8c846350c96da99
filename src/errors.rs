//! Error types for the console store
//!
//! Every failure is caught at the store boundary, projected into the relevant
//! `error` field, and handed back to the caller. None of these are fatal to
//! the process; retry is always a caller decision.

use std::path::PathBuf;
use thiserror::Error;

/// Login-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// The server rejected the credentials (or the auth endpoint failed)
    #[error("{message}")]
    Rejected { message: String },

    /// HTTP request failed before a response arrived
    #[error("Login request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server accepted the login but the profile could not be read
    #[error("Login response could not be read: {reason}")]
    InvalidResponse { reason: String },

    /// The login URL could not be built from the configured base URL
    #[error("Invalid login URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl AuthError {
    /// Human-readable message suitable for the auth error field
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Collection, detail and category fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Server returned a non-success status
    #[error("{message} (HTTP {status})")]
    Status {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// Transport or network failure
    #[error("Failed to load {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not have the expected shape
    #[error("Failed to load {operation}: unexpected response ({reason})")]
    Decode {
        operation: &'static str,
        reason: String,
    },

    /// Request URL could not be built
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A newer request for the same collection replaced this one
    #[error("Request for {operation} was superseded by a newer request")]
    Superseded { operation: &'static str },
}

impl FetchError {
    /// Build the status error for an operation, using the standard wording
    pub fn status(operation: &'static str, status: u16) -> Self {
        Self::Status {
            operation,
            status,
            message: format!("Failed to load {}", operation),
        }
    }

    /// The operation this error belongs to, if known
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            FetchError::Status { operation, .. }
            | FetchError::Transport { operation, .. }
            | FetchError::Decode { operation, .. }
            | FetchError::Superseded { operation } => Some(operation),
            FetchError::InvalidUrl { .. } => None,
        }
    }

    /// Whether this failure should be shown to users
    ///
    /// Superseded requests are dropped silently: a newer request owns the view.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, FetchError::Superseded { .. })
    }
}

/// Session persistence errors
#[derive(Error, Debug)]
pub enum PersistError {
    /// File I/O error while reading or writing the session
    #[error("Session storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored session is not valid JSON
    #[error("Session storage is corrupted")]
    Json(#[from] serde_json::Error),

    /// No location could be determined for the session file
    #[error("Could not determine session storage location")]
    NoLocation,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered
    #[error("Configuration could not be serialized")]
    Serialize(#[from] toml::ser::Error),

    /// HTTP client could not be built from the client settings
    #[error("HTTP client could not be built")]
    HttpClient(#[from] reqwest::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("Configuration I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Persistence error
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("{message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is worth offering a retry for
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(FetchError::Transport { .. })
            | AppError::Fetch(FetchError::Superseded { .. })
            | AppError::Auth(AuthError::Http(_))
            | AppError::Persist(PersistError::Io { .. }) => true,

            AppError::Fetch(FetchError::Status { status, .. }) => *status >= 500,

            AppError::Auth(AuthError::Rejected { .. })
            | AppError::Config(ConfigError::InvalidFormat(_)) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "authentication",
            AppError::Fetch(_) => "fetch",
            AppError::Persist(_) => "persistence",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Persistence result type alias
pub type PersistResult<T> = std::result::Result<T, PersistError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
