use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Bad structure, bad signature, wrong algorithm or missing claims.
    #[error("Token is malformed: {0}")]
    Malformed(String),

    /// Signature checked out but `exp` is in the past.
    #[error("Token is expired")]
    TokenExpired,
}
