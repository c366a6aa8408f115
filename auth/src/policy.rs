//! Authorization policy.
//!
//! Decides allow/deny for an operation from the validated session claims alone.
//! Two orthogonal rules exist: the role check (admin-only operations) and the
//! ownership check (product mutations). Neither touches storage; callers load
//! the resource owner first and pass it in.

use crate::errors::AuthError;
use crate::jwt::SessionClaims;

/// Operations gated by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListUsers,
    GetUser,
    UpdateUser,
    DeleteUser,
    /// Registering an account with the admin role.
    RegisterAdmin,
    /// Registering an ordinary account.
    RegisterUser,
    ListAllProducts,
    ListOwnProducts,
    GetProduct,
    CreateProduct,
    UpdateProduct {
        owner_id: i64,
    },
    DeleteProduct {
        owner_id: i64,
    },
}

impl Operation {
    /// Whether the operation can be performed without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Operation::GetProduct | Operation::RegisterUser)
    }

    fn requires_admin(&self) -> bool {
        matches!(
            self,
            Operation::ListUsers
                | Operation::GetUser
                | Operation::UpdateUser
                | Operation::DeleteUser
                | Operation::RegisterAdmin
                | Operation::ListAllProducts
        )
    }

    fn required_owner(&self) -> Option<i64> {
        match self {
            Operation::UpdateProduct { owner_id } | Operation::DeleteProduct { owner_id } => {
                Some(*owner_id)
            }
            _ => None,
        }
    }
}

/// Decide whether the caller may perform `operation`.
///
/// Ownership is strict: only the recorded owner may update or delete a product,
/// and the admin flag does not override it.
///
/// # Errors
/// * `TokenMissing` - Protected operation without a session
/// * `InsufficientRole` - Admin-only operation and the session is not admin
/// * `OwnershipViolation` - Caller is not the resource owner
pub fn authorize(claims: Option<&SessionClaims>, operation: Operation) -> Result<(), AuthError> {
    if operation.is_public() {
        return Ok(());
    }

    let claims = claims.ok_or(AuthError::TokenMissing)?;

    if operation.requires_admin() {
        require_admin(claims)?;
    }

    if let Some(owner_id) = operation.required_owner() {
        require_owner(claims, owner_id)?;
    }

    Ok(())
}

/// Role check.
pub fn require_admin(claims: &SessionClaims) -> Result<(), AuthError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole)
    }
}

/// Ownership check.
pub fn require_owner(claims: &SessionClaims, owner_id: i64) -> Result<(), AuthError> {
    if claims.id == owner_id {
        Ok(())
    } else {
        Err(AuthError::OwnershipViolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: i64, admin: bool) -> SessionClaims {
        SessionClaims {
            id,
            username: format!("user{}", id),
            admin,
            exp: i64::MAX,
        }
    }

    const ADMIN_ONLY: [Operation; 6] = [
        Operation::ListUsers,
        Operation::GetUser,
        Operation::UpdateUser,
        Operation::DeleteUser,
        Operation::RegisterAdmin,
        Operation::ListAllProducts,
    ];

    #[test]
    fn test_admin_only_operations() {
        let admin = claims(1, true);
        let user = claims(2, false);

        for operation in ADMIN_ONLY {
            assert_eq!(authorize(Some(&admin), operation), Ok(()));
            assert_eq!(
                authorize(Some(&user), operation),
                Err(AuthError::InsufficientRole)
            );
            assert_eq!(authorize(None, operation), Err(AuthError::TokenMissing));
        }
    }

    #[test]
    fn test_public_operations() {
        assert_eq!(authorize(None, Operation::GetProduct), Ok(()));
        assert_eq!(authorize(None, Operation::RegisterUser), Ok(()));
        assert_eq!(
            authorize(Some(&claims(2, false)), Operation::GetProduct),
            Ok(())
        );
    }

    #[test]
    fn test_any_session_may_create_and_list_own() {
        let user = claims(2, false);
        assert_eq!(authorize(Some(&user), Operation::CreateProduct), Ok(()));
        assert_eq!(authorize(Some(&user), Operation::ListOwnProducts), Ok(()));
        assert_eq!(
            authorize(None, Operation::CreateProduct),
            Err(AuthError::TokenMissing)
        );
    }

    #[test]
    fn test_owner_may_mutate() {
        let owner = claims(5, false);
        assert_eq!(
            authorize(Some(&owner), Operation::UpdateProduct { owner_id: 5 }),
            Ok(())
        );
        assert_eq!(
            authorize(Some(&owner), Operation::DeleteProduct { owner_id: 5 }),
            Ok(())
        );
    }

    #[test]
    fn test_non_owner_is_rejected() {
        let other = claims(6, false);
        assert_eq!(
            authorize(Some(&other), Operation::UpdateProduct { owner_id: 5 }),
            Err(AuthError::OwnershipViolation)
        );
        assert_eq!(
            authorize(Some(&other), Operation::DeleteProduct { owner_id: 5 }),
            Err(AuthError::OwnershipViolation)
        );
    }

    #[test]
    fn test_admin_does_not_bypass_ownership() {
        let admin = claims(1, true);
        assert_eq!(
            authorize(Some(&admin), Operation::DeleteProduct { owner_id: 5 }),
            Err(AuthError::OwnershipViolation)
        );
    }
}
