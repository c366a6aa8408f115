use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::ProductId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductData;
use crate::inbound::http::router::AppState;

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let product_id = ProductId::from_string(&id).map_err(ProductError::from)?;

    state
        .product_service
        .get_product(&product_id)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}
