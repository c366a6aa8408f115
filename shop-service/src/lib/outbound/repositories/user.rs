use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, role, created_at, updated_at";

/// PostgreSQL credential store.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User, UserError> {
        let role: Option<String> = row.try_get("role").map_err(database_error)?;
        let first_name: Option<String> = row.try_get("first_name").map_err(database_error)?;
        let last_name: Option<String> = row.try_get("last_name").map_err(database_error)?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(database_error)?),
            username: Username::new(row.try_get("username").map_err(database_error)?)?,
            email: EmailAddress::new(row.try_get("email").map_err(database_error)?)?,
            password_hash: row.try_get("password_hash").map_err(database_error)?,
            first_name: first_name.map(PersonName::new).transpose()?,
            last_name: last_name.map(PersonName::new).transpose()?,
            role: Role::from_stored(role.as_deref())?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE {} = $1",
            USER_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn write_error(e: sqlx::Error, username: &Username, email: &EmailAddress) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(username.as_str().to_string());
            }
            if db_err.constraint() == Some("users_email_key") {
                return UserError::EmailAlreadyExists(email.as_str().to_string());
            }
        }
    }
    database_error(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.first_name.as_ref().map(PersonName::as_str))
        .bind(user.last_name.as_ref().map(PersonName::as_str))
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username, &user.email))?;

        Self::row_to_user(&row)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.find_one("email", email).await
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4,
                first_name = $5, last_name = $6, role = $7, updated_at = $8
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.first_name.as_ref().map(PersonName::as_str))
        .bind(user.last_name.as_ref().map(PersonName::as_str))
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username, &user.email))?;

        match row {
            Some(row) => Self::row_to_user(&row),
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
