use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Fixed lifetime of every session token.
pub const SESSION_LIFETIME_HOURS: i64 = 24;

/// Identity facts captured at login and baked into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

/// Session claims carried by the `_token` cookie.
///
/// Produced once at login and never mutated. The admin flag reflects the role at
/// issuance time; a later role change only takes effect on the next login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Principal identifier
    pub id: i64,

    pub username: String,

    /// Whether the principal held the admin role when the token was issued
    pub admin: bool,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for an identity, expiring [`SESSION_LIFETIME_HOURS`] after `issued_at`.
    pub fn for_identity(identity: &SessionIdentity, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + Duration::hours(SESSION_LIFETIME_HOURS);

        Self {
            id: identity.id,
            username: identity.username.clone(),
            admin: identity.is_admin,
            exp: expiration.timestamp(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Expiry as a UTC instant, if the timestamp is representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// The identity this session was issued for.
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            id: self.id,
            username: self.username.clone(),
            is_admin: self.admin,
        }
    }
}
