use thiserror::Error;

/// Failures while reading the notes tree.
///
/// The first three variants mean "nothing to show here" and map to 404; the
/// rest are read or parse failures and map to 500.
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("directory not found")]
    DirectoryNotFound,
    #[error("file not found")]
    FileNotFound,
    #[error("path escapes base directory: {0}")]
    OutsideBase(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl NotesError {
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound | Self::FileNotFound | Self::OutsideBase(_)
        )
    }
}
