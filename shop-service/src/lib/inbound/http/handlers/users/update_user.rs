use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::parse_body;
use crate::inbound::http::validation::FieldErrors;
use crate::user::errors::UserError;

/// HTTP request body for updating a user (raw JSON)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ApiError> {
        let mut errors = FieldErrors::new();

        let username = errors.check("username", self.username.map(Username::new).transpose());
        let email = errors.check("email", self.email.map(EmailAddress::new).transpose());
        let password = errors.check("password", self.password.map(Password::new).transpose());
        let first_name = errors.check(
            "firstName",
            self.first_name.map(PersonName::new).transpose(),
        );
        let last_name = errors.check("lastName", self.last_name.map(PersonName::new).transpose());
        let role = errors.check("role", self.role.map(|r| r.parse::<Role>()).transpose());

        match (username, email, password, first_name, last_name, role) {
            (
                Some(username),
                Some(email),
                Some(password),
                Some(first_name),
                Some(last_name),
                Some(role),
            ) => Ok(UpdateUserCommand {
                username,
                email,
                password,
                first_name,
                last_name,
                role,
            }),
            _ => Err(errors.into_api_error()),
        }
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let command = parse_body(payload)?.try_into_command()?;

    state
        .user_service
        .update_user(&user_id, command, &claims)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update() {
        let command = UpdateUserRequest {
            role: Some("admin".to_string()),
            ..UpdateUserRequest::default()
        }
        .try_into_command()
        .unwrap();

        assert_eq!(command.role, Some(Role::Admin));
        assert!(command.username.is_none());
        assert!(command.password.is_none());
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let err = UpdateUserRequest {
            email: Some("not-an-email".to_string()),
            role: Some("owner".to_string()),
            ..UpdateUserRequest::default()
        }
        .try_into_command()
        .unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("email") && m.contains("role")));
    }
}
