//! Unified application error types for DocVault.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// The file a transfer reads from does not exist.
    SourceNotFound,
    /// The destination folder of a transfer does not exist.
    TargetFolderNotFound,
    /// The blob store or the catalog could not be reached or failed transiently.
    StoreUnavailable,
    /// A catalog uniqueness or foreign-key constraint was violated, or a blob
    /// path is already occupied.
    ConstraintViolation,
    /// A bulk move named more than one destination folder.
    InvalidBulkMove,
    /// No acting user was supplied for an attributed operation.
    Unauthenticated,
    /// Every item of a bulk operation failed.
    PartialBulkFailure,
    /// A folder still contains files and cannot be deleted.
    FolderNotEmpty,
    /// A copy failed after it started writing.
    CopyFailed,
    /// A move failed before its catalog update committed.
    MoveFailed,
    /// An upload failed after it started writing.
    UploadFailed,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::SourceNotFound => write!(f, "SOURCE_NOT_FOUND"),
            Self::TargetFolderNotFound => write!(f, "TARGET_FOLDER_NOT_FOUND"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::ConstraintViolation => write!(f, "CONSTRAINT_VIOLATION"),
            Self::InvalidBulkMove => write!(f, "INVALID_BULK_MOVE"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::PartialBulkFailure => write!(f, "PARTIAL_BULK_FAILURE"),
            Self::FolderNotEmpty => write!(f, "FOLDER_NOT_EMPTY"),
            Self::CopyFailed => write!(f, "COPY_FAILED"),
            Self::MoveFailed => write!(f, "MOVE_FAILED"),
            Self::UploadFailed => write!(f, "UPLOAD_FAILED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout DocVault.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. When one `AppError` wraps another (a
/// failed copy wrapping the catalog error that caused it), the inner error
/// is kept as the `source` so [`AppError::root_kind`] can recover it.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a source-not-found error.
    pub fn source_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SourceNotFound, message)
    }

    /// Create a target-folder-not-found error.
    pub fn target_folder_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TargetFolderNotFound, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a constraint-violation error.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstraintViolation, message)
    }

    /// Create an invalid-bulk-move error.
    pub fn invalid_bulk_move(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidBulkMove, message)
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Create a folder-not-empty error.
    pub fn folder_not_empty(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FolderNotEmpty, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Wrap `cause` in an error of `kind`, keeping it as the source.
    pub fn wrap(kind: ErrorKind, message: impl Into<String>, cause: AppError) -> Self {
        Self::with_source(kind, message, cause)
    }

    /// The kind of the innermost `AppError` in the source chain.
    ///
    /// For an error that wraps no other `AppError` this is `self.kind`.
    pub fn root_kind(&self) -> ErrorKind {
        let mut kind = self.kind;
        let mut current: Option<&(dyn std::error::Error + 'static)> = self
            .source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static));
        while let Some(err) = current {
            if let Some(app) = err.downcast_ref::<AppError>() {
                kind = app.kind;
            }
            current = err.source();
        }
        kind
    }

    /// Whether this error (or its root cause) is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind || self.root_kind() == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::AlreadyExists => ErrorKind::ConstraintViolation,
            _ => ErrorKind::StoreUnavailable,
        };
        Self::with_source(kind, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
