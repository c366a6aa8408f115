use thiserror::Error;

use crate::jwt::JwtError;

/// Every way authentication or authorization can end without success.
///
/// Display strings are safe to show to callers. Internal variants carry detail
/// for server-side logs only; see [`AuthError::public_message`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Login must include one of credential email or username")]
    MalformedCredentials,

    /// Unknown identity or wrong password; deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing or malformed JWT")]
    TokenMissing,

    #[error("Invalid or expired JWT")]
    TokenMalformed,

    #[error("Invalid or expired JWT")]
    TokenExpired,

    #[error("Unauthorized access this resource.")]
    InsufficientRole,

    #[error("You do not own this resource.")]
    OwnershipViolation,

    #[error("Session issuance failed: {0}")]
    IssuanceFailure(String),

    #[error("Credential store failure: {0}")]
    StoreFailure(String),
}

impl AuthError {
    /// Internal failures are the server's fault, not the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::IssuanceFailure(_) | AuthError::StoreFailure(_)
        )
    }

    /// Message suitable for the response body; internal detail is withheld.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::TokenExpired,
            JwtError::Malformed(_) => AuthError::TokenMalformed,
            JwtError::EncodingFailed(detail) => AuthError::IssuanceFailure(detail),
        }
    }
}
