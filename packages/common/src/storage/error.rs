use std::fmt;

/// Errors from the uploaded-file store.
#[derive(Debug)]
pub enum StorageError {
    /// No file is stored under this reference.
    NotFound(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The reference could escape the upload directory or has unsafe characters.
    InvalidReference(String),
    /// The file exceeds the configured size limit.
    SizeLimitExceeded { actual: u64, limit: u64 },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(reference) => write!(f, "upload not found: {reference}"),
            Self::Io(err) => write!(f, "upload storage IO error: {err}"),
            Self::InvalidReference(reference) => write!(f, "invalid upload reference: {reference}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "upload exceeds size limit ({actual} > {limit} bytes)")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
