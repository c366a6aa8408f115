use auth::SessionClaims;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::session_token;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::parse_body;
use crate::inbound::http::validation::FieldErrors;
use crate::user::errors::UserError;

/// Register an account.
///
/// Public for the `user` role. Asking for the `admin` role requires the
/// request to carry an admin session.
pub async fn register_user(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = parse_body(payload)?.try_into_command()?;

    let caller: Option<SessionClaims> = match command.role {
        Role::Admin => Some(state.authenticator.validate_session(session_token(&jar))?),
        Role::User => None,
    };

    state
        .user_service
        .register_user(command, caller.as_ref())
        .await
        .map_err(registration_error)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// Store failures collapse into one message so the response does not reveal
/// which identifier was already taken.
fn registration_error(err: UserError) -> ApiError {
    match err {
        UserError::Auth(auth_error) => ApiError::from(auth_error),
        other => {
            tracing::warn!(error = %other, "Registration failed");
            ApiError::InternalServerError("Failed to create user".to_string())
        }
    }
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterUserRequest {
    username: String,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    role: Option<String>,
}

impl RegisterUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ApiError> {
        let mut errors = FieldErrors::new();

        let username = errors.check("username", Username::new(self.username));
        let email = errors.check("email", EmailAddress::new(self.email));
        let password = errors.check("password", Password::new(self.password));
        let first_name = errors.check(
            "firstName",
            self.first_name.map(PersonName::new).transpose(),
        );
        let last_name = errors.check("lastName", self.last_name.map(PersonName::new).transpose());
        let role = errors.check(
            "role",
            self.role
                .map(|r| r.parse::<Role>())
                .transpose()
                .map(Option::unwrap_or_default),
        );

        match (username, email, password, first_name, last_name, role) {
            (
                Some(username),
                Some(email),
                Some(password),
                Some(first_name),
                Some(last_name),
                Some(role),
            ) => Ok(CreateUserCommand {
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
