//! Error types for bundle resolution.

/// Bundle resolution errors.
///
/// Resolution is deliberately permissive: unrecognized overlay types,
/// missing fields, and dangling flagged-attribute names are all tolerated.
/// The only fatal condition is a document without a usable capture base.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The capture base record is absent or not a valid record.
    #[error("malformed capture base: {reason}")]
    MalformedCaptureBase { reason: String },

    /// The bundle document text is not valid JSON.
    #[error("invalid bundle document: {message}")]
    InvalidDocument { message: String },
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidDocument {
            message: err.to_string(),
        }
    }
}

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;
