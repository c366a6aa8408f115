//! Authentication and authorization library
//!
//! Provides the session security core of the shop backend:
//! - Password hashing (Argon2id, fails closed on verify)
//! - Signed, self-contained session tokens (HS256, fixed 24 hour lifetime)
//! - Session validation with distinct missing/malformed/expired outcomes
//! - Role and ownership authorization policy
//!
//! Nothing here performs I/O. Sessions are stateless: there is no server-side
//! store and no revocation, so a token stays valid until its `exp`.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other", &hash));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Credential, SessionIdentity};
//! use auth::policy::{authorize, Operation};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let credential = Credential {
//!     identity: SessionIdentity { id: 1, username: "alice".to_string(), is_admin: false },
//!     password_hash: auth.hash_password("password123").unwrap(),
//! };
//!
//! // Login: verify and issue a session
//! let session = auth.authenticate("password123", Some(&credential)).unwrap();
//!
//! // Later request: validate and authorize
//! let claims = auth.validate_session(Some(&session.token)).unwrap();
//! assert!(authorize(Some(&claims), Operation::CreateProduct).is_ok());
//! assert!(authorize(Some(&claims), Operation::ListUsers).is_err());
//! ```

pub mod authenticator;
pub mod errors;
pub mod jwt;
pub mod password;
pub mod policy;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::Credential;
pub use authenticator::IssuedSession;
pub use authenticator::INSECURE_DEFAULT_SECRET;
pub use errors::AuthError;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use jwt::SessionIdentity;
pub use jwt::SESSION_LIFETIME_HOURS;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use policy::Operation;
