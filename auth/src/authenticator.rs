use chrono::DateTime;
use chrono::Utc;

use crate::errors::AuthError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::jwt::SessionIdentity;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Fallback signing secret used when none is configured.
///
/// INSECURE DEFAULT, DO NOT USE IN PRODUCTION: anyone who reads this source can
/// forge sessions for any user, admins included.
pub const INSECURE_DEFAULT_SECRET: &str = "secret";

/// Authentication coordinator combining password verification and session tokens.
///
/// Holds no per-request state. Build once at startup and share it read-only.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    insecure_default: bool,
}

/// A freshly minted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Signed bearer token for the `_token` cookie
    pub token: String,
    pub claims: SessionClaims,
}

/// Stored credential of a looked-up identity.
#[derive(Debug, Clone)]
pub struct Credential {
    pub identity: SessionIdentity,
    pub password_hash: String,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for session signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            insecure_default: false,
        }
    }

    /// Create an authenticator from a configured secret, falling back to
    /// [`INSECURE_DEFAULT_SECRET`] when it is empty.
    pub fn from_configured_secret(secret: &str) -> Self {
        if secret.is_empty() {
            tracing::warn!(
                "No JWT secret configured, signing sessions with the insecure default secret"
            );
            Self {
                insecure_default: true,
                ..Self::new(INSECURE_DEFAULT_SECRET.as_bytes())
            }
        } else {
            Self::new(secret.as_bytes())
        }
    }

    /// Whether sessions are signed with the insecure fallback secret.
    pub fn uses_insecure_default(&self) -> bool {
        self.insecure_default
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a session.
    ///
    /// `candidate` is the result of the identity lookup. When it is `None` a
    /// decoy verification still runs, so an unknown identity and a wrong
    /// password take comparable time and produce the same error.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identity or password mismatch
    /// * `IssuanceFailure` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        candidate: Option<&Credential>,
    ) -> Result<IssuedSession, AuthError> {
        let verified = match candidate {
            Some(credential) => self
                .password_hasher
                .verify(password, &credential.password_hash),
            None => self.password_hasher.verify_decoy(password),
        };

        match candidate {
            Some(credential) if verified => self.issue_session(&credential.identity),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Issue a session starting now.
    ///
    /// # Errors
    /// * `IssuanceFailure` - Token signing failed
    pub fn issue_session(&self, identity: &SessionIdentity) -> Result<IssuedSession, AuthError> {
        self.issue_session_at(identity, Utc::now())
    }

    /// Issue a session as if it were `issued_at`.
    ///
    /// # Errors
    /// * `IssuanceFailure` - Token signing failed
    pub fn issue_session_at(
        &self,
        identity: &SessionIdentity,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedSession, AuthError> {
        let claims = SessionClaims::for_identity(identity, issued_at);
        let token = self.jwt_handler.encode(&claims).map_err(|e| {
            tracing::error!(user_id = identity.id, error = %e, "Failed to sign session token");
            AuthError::from(e)
        })?;

        tracing::debug!(
            user_id = identity.id,
            expires_at = ?claims.expires_at(),
            "Issued session"
        );

        Ok(IssuedSession { token, claims })
    }

    /// Validate a session token taken from the request.
    ///
    /// # Errors
    /// * `TokenMissing` - No token, or an empty one
    /// * `TokenMalformed` - Bad structure, signature or algorithm
    /// * `TokenExpired` - Authentic but past its expiry
    pub fn validate_session(&self, token: Option<&str>) -> Result<SessionClaims, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::TokenMissing)?;

        self.jwt_handler
            .decode::<SessionClaims>(token)
            .map_err(AuthError::from)
    }
}
