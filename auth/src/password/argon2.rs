use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Salted, memory-hard one-way hashing (internally uses Argon2id). Every call is
/// CPU-bound; async callers should run it on a blocking worker thread.
pub struct PasswordHasher {
    /// Hash of a throwaway password, verified against when no stored hash exists
    /// so that unknown identities cost the same as wrong passwords.
    decoy_hash: Option<String>,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        let decoy_hash = Self::hash_with_fresh_salt("decoy-password-never-matches").ok();
        Self { decoy_hash }
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Self::hash_with_fresh_salt(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// Fails closed: a malformed stored hash or any internal error counts as a
    /// mismatch, never as a match.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Burn the same work as a real verification, then report a mismatch.
    ///
    /// Used when the identity lookup found nothing.
    pub fn verify_decoy(&self, password: &str) -> bool {
        if let Some(decoy) = &self.decoy_hash {
            let _ = self.verify(password, decoy);
        }
        false
    }

    fn hash_with_fresh_salt(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
