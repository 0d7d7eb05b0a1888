use thiserror::Error;

/// Errors from the card log and the upload store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Disk read/write failure. Not retried; surfaced to the caller.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A card failed to serialize before being appended.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Uploaded file extension is outside the allow-list.
    #[error("unsupported file type: {filename}")]
    UnsupportedFileType {
        /// The original (client-supplied) filename.
        filename: String,
    },

    /// Uploaded filename is empty after sanitization.
    #[error("invalid filename: {original:?}")]
    InvalidFilename {
        /// The original (client-supplied) filename.
        original: String,
    },
}
