use auth::AuthError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::session_cookie;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::parse_body;
use crate::inbound::http::validation::FieldErrors;

const MAX_IDENTIFIER_LENGTH: usize = 32;
const MAX_PASSWORD_LENGTH: usize = 32;

pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let command = parse_body(payload)?.try_into_command()?;

    let (user, session) = state.user_service.login(command).await?;

    let jar = jar.add(session_cookie(&session));
    let data = LoginResponseData {
        token: session.token,
        is_admin: session.claims.admin,
        expires_at: session.claims.exp,
        user: (&user).into(),
    };

    Ok((jar, ApiSuccess::new(StatusCode::OK, data)))
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    username: Option<String>,
    email: Option<String>,
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ApiError> {
        let mut errors = FieldErrors::new();

        for (field, value) in [("username", &self.username), ("email", &self.email)] {
            if value
                .as_deref()
                .is_some_and(|v| v.chars().count() > MAX_IDENTIFIER_LENGTH)
            {
                errors.reject(field, "must be at most 32 characters");
            }
        }
        if self.password.is_empty() {
            errors.reject("password", "required");
        } else if self.password.chars().count() > MAX_PASSWORD_LENGTH {
            errors.reject("password", "must be at most 32 characters");
        }

        if !errors.is_empty() {
            return Err(errors.into_api_error());
        }

        let username = self.username.filter(|u| !u.is_empty());
        let email = self.email.filter(|e| !e.is_empty());
        let identifier = match (username, email) {
            (Some(username), _) => LoginIdentifier::Username(username),
            (None, Some(email)) => LoginIdentifier::Email(email),
            (None, None) => return Err(AuthError::MalformedCredentials.into()),
        };

        Ok(LoginCommand {
            identifier,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub token: String,
    pub is_admin: bool,
    /// Unix timestamp after which the token is rejected
    pub expires_at: i64,
    pub user: UserData,
}
