/// Errors that can occur during metadata processing
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A required footer key is absent
    #[error("Missing metadata key: {0}")]
    MissingKey(String),

    /// A footer key holds a value of the wrong kind
    #[error("Unexpected value for metadata key '{key}': expected {expected}, found '{found}'")]
    UnexpectedValue {
        /// Footer key
        key: String,
        /// Expected value
        expected: String,
        /// Actual value
        found: String,
    },
}
