use async_trait::async_trait;
use auth::IssuedSession;
use auth::SessionClaims;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
///
/// Operations that need a session take the validated claims and consult the
/// authorization policy before touching storage.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// Registering with the admin role is admin-initiated registration and
    /// requires an admin session in `caller`.
    ///
    /// # Errors
    /// * `Auth(TokenMissing)` - Admin role requested without a session
    /// * `Auth(InsufficientRole)` - Admin role requested by a non-admin
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    /// * `DatabaseError` - Database operation failed
    async fn register_user(
        &self,
        command: CreateUserCommand,
        caller: Option<&SessionClaims>,
    ) -> Result<User, UserError>;

    /// Verify credentials and issue a session.
    ///
    /// # Errors
    /// * `Auth(InvalidCredentials)` - Unknown identity or wrong password
    /// * `Auth(StoreFailure)` - Lookup failed or timed out
    /// * `Auth(IssuanceFailure)` - Token signing failed
    async fn login(&self, command: LoginCommand) -> Result<(User, IssuedSession), UserError>;

    /// Create the configured admin account unless the username is taken.
    ///
    /// # Returns
    /// The created admin, or None when the username already existed
    async fn ensure_admin(&self, command: CreateUserCommand) -> Result<Option<User>, UserError>;

    /// List all users. Admin only.
    async fn list_users(&self, caller: &SessionClaims) -> Result<Vec<User>, UserError>;

    /// Retrieve user by identifier. Admin only.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId, caller: &SessionClaims) -> Result<User, UserError>;

    /// Update existing user with optional fields. Admin only.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
        caller: &SessionClaims,
    ) -> Result<User, UserError>;

    /// Delete existing user and, through the store, their products. Admin only.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn delete_user(&self, id: &UserId, caller: &SessionClaims) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
///
/// This is the credential store. Uniqueness of username and email and atomic
/// creation are the store's responsibility.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Returns
    /// Created user entity with its assigned identifier
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by exact email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
