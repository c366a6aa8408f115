use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    state
        .user_service
        .list_users(&claims)
        .await
        .map_err(ApiError::from)
        .map(|users| ApiSuccess::new(StatusCode::OK, users.iter().map(UserData::from).collect()))
}
