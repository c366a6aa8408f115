use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<ProductData>>, ApiError> {
    state
        .product_service
        .list_products(&claims)
        .await
        .map_err(ApiError::from)
        .map(|products| {
            ApiSuccess::new(
                StatusCode::OK,
                products.iter().map(ProductData::from).collect(),
            )
        })
}
