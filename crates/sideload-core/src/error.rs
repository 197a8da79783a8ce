//! Error types module
//!
//! Every way an import can end is described by [`ImportError`]. The variants
//! are terminal except [`ImportError::MetadataUpdateFailed`], which the
//! importer reports as a warning next to a successfully created asset.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like rejected input
    Debug,
    /// Warning level - for best-effort steps that did not complete
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be reported to callers.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "FETCH_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether running the same import again may succeed
    fn is_recoverable(&self) -> bool;

    /// Whether the error ends the import
    fn is_terminal(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Descriptive record field touched by a best-effort update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    /// Title, caption or description.
    Fields,
    AltText,
    /// Dimensions and file size.
    Attachment,
}

impl Display for MetadataField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataField::Fields => write!(f, "fields"),
            MetadataField::AltText => write!(f, "alt_text"),
            MetadataField::Attachment => write!(f, "attachment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Unsupported type: {mime_type}")]
    UnsupportedType { mime_type: String },

    #[error("Persist failed: {0}")]
    PersistFailed(String),

    #[error("Record creation failed: {0}")]
    RecordCreationFailed(String),

    #[error("Metadata update failed ({field}): {message}")]
    MetadataUpdateFailed {
        field: MetadataField,
        message: String,
    },
}

/// A type alias for `Result<T, ImportError>`.
pub type ImportResult<T> = Result<T, ImportError>;

/// Static metadata for each variant: (error_code, recoverable, terminal, log_level).
fn import_error_static_metadata(err: &ImportError) -> (&'static str, bool, bool, LogLevel) {
    match err {
        ImportError::InvalidUrl(_) => ("INVALID_URL", false, true, LogLevel::Debug),
        ImportError::FetchFailed(_) => ("FETCH_FAILED", true, true, LogLevel::Warn),
        ImportError::UnsupportedType { .. } => ("UNSUPPORTED_TYPE", false, true, LogLevel::Debug),
        ImportError::PersistFailed(_) => ("PERSIST_FAILED", true, true, LogLevel::Error),
        ImportError::RecordCreationFailed(_) => {
            ("RECORD_CREATION_FAILED", true, true, LogLevel::Error)
        }
        ImportError::MetadataUpdateFailed { .. } => {
            ("METADATA_UPDATE_FAILED", true, false, LogLevel::Warn)
        }
    }
}

impl ImportError {
    /// Get the error type name
    pub fn error_type(&self) -> &str {
        match self {
            ImportError::InvalidUrl(_) => "InvalidUrl",
            ImportError::FetchFailed(_) => "FetchFailed",
            ImportError::UnsupportedType { .. } => "UnsupportedType",
            ImportError::PersistFailed(_) => "PersistFailed",
            ImportError::RecordCreationFailed(_) => "RecordCreationFailed",
            ImportError::MetadataUpdateFailed { .. } => "MetadataUpdateFailed",
        }
    }
}

impl ErrorMetadata for ImportError {
    fn error_code(&self) -> &'static str {
        import_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        import_error_static_metadata(self).1
    }

    fn is_terminal(&self) -> bool {
        import_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        import_error_static_metadata(self).3
    }
}
