use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::policy;
use auth::policy::Operation;
use auth::AuthError;
use auth::Authenticator;
use auth::Credential;
use auth::IssuedSession;
use auth::SessionClaims;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    lookup_timeout: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Shared password hasher and session issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            lookup_timeout: Self::DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the deadline for credential lookups during login.
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    async fn hash_password(&self, password: &Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.expose().to_string();

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))
    }

    async fn lookup(&self, identifier: &LoginIdentifier) -> Result<Option<User>, AuthError> {
        let lookup = async {
            match identifier {
                LoginIdentifier::Username(username) => {
                    self.repository.find_by_username(username).await
                }
                LoginIdentifier::Email(email) => self.repository.find_by_email(email).await,
            }
        };

        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(user)) => Ok(user),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Credential lookup failed");
                Err(AuthError::StoreFailure(e.to_string()))
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Credential lookup timed out"
                );
                Err(AuthError::StoreFailure(
                    "credential lookup timed out".to_string(),
                ))
            }
        }
    }

    async fn create(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(&command.password).await?;

        let new_user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
            role: command.role,
        };

        let created = self.repository.create(new_user).await.map_err(|e| {
            if e.is_uniqueness_violation() {
                tracing::warn!(error = %e, "User creation rejected by store");
            } else {
                tracing::error!(error = %e, "User creation failed");
            }
            e
        })?;

        tracing::info!(
            user_id = %created.id,
            role = %created.role,
            "User registered"
        );

        Ok(created)
    }

    async fn find_existing(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register_user(
        &self,
        command: CreateUserCommand,
        caller: Option<&SessionClaims>,
    ) -> Result<User, UserError> {
        let operation = match command.role {
            Role::Admin => Operation::RegisterAdmin,
            Role::User => Operation::RegisterUser,
        };
        policy::authorize(caller, operation)?;

        self.create(command).await
    }

    async fn login(&self, command: LoginCommand) -> Result<(User, IssuedSession), UserError> {
        let user = self.lookup(&command.identifier).await?;

        let credential = user.as_ref().map(|u| Credential {
            identity: u.session_identity(),
            password_hash: u.password_hash.clone(),
        });
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;

        let outcome = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, credential.as_ref())
        })
        .await
        .map_err(|e| AuthError::IssuanceFailure(format!("Login task failed: {}", e)))?;

        let session = outcome.map_err(|e| {
            if e.is_internal() {
                tracing::error!(error = %e, "Login failed");
            } else {
                tracing::debug!(error = %e, "Login rejected");
            }
            e
        })?;
        let user = user.ok_or(AuthError::InvalidCredentials)?;

        tracing::info!(
            user_id = %user.id,
            admin = session.claims.admin,
            "Session issued"
        );

        Ok((user, session))
    }

    async fn ensure_admin(&self, command: CreateUserCommand) -> Result<Option<User>, UserError> {
        if self
            .repository
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let command = CreateUserCommand {
            role: Role::Admin,
            ..command
        };
        self.create(command).await.map(Some)
    }

    async fn list_users(&self, caller: &SessionClaims) -> Result<Vec<User>, UserError> {
        policy::authorize(Some(caller), Operation::ListUsers)?;
        self.repository.list_all().await
    }

    async fn get_user(&self, id: &UserId, caller: &SessionClaims) -> Result<User, UserError> {
        policy::authorize(Some(caller), Operation::GetUser)?;
        self.find_existing(id).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
        caller: &SessionClaims,
    ) -> Result<User, UserError> {
        policy::authorize(Some(caller), Operation::UpdateUser)?;

        let mut user = self.find_existing(id).await?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(&new_password).await?;
        }

        if let Some(first_name) = command.first_name {
            user.first_name = Some(first_name);
        }

        if let Some(last_name) = command.last_name {
            user.last_name = Some(last_name);
        }

        if let Some(role) = command.role {
            user.role = role;
        }

        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        tracing::info!(user_id = %updated.id, by = caller.id, "User updated");

        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId, caller: &SessionClaims) -> Result<(), UserError> {
        policy::authorize(Some(caller), Operation::DeleteUser)?;

        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, by = caller.id, "User deleted");

        Ok(())
    }
}
