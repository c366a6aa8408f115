use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::ProductId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let product_id = ProductId::from_string(&id).map_err(ProductError::from)?;

    state
        .product_service
        .delete_product(&product_id, &claims)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Product deleted")))
}
