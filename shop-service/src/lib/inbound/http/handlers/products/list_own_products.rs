use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Products owned by the session's user.
pub async fn list_own_products(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<ProductData>>, ApiError> {
    let products = state.product_service.list_own_products(&claims).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        products.iter().map(ProductData::from).collect(),
    ))
}
