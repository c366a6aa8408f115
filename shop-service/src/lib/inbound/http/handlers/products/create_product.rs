use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Price;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::Quantity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::parse_body;
use crate::inbound::http::validation::FieldErrors;

/// Create a product owned by the session's user. The body cannot name an owner.
pub async fn create_product(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let command = parse_body(payload)?.try_into_command()?;

    state
        .product_service
        .create_product(command, &claims)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

/// HTTP request body for creating a product (raw JSON)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateProductRequest {
    name: String,
    quantity: i64,
    price: f64,
}

impl CreateProductRequest {
    fn try_into_command(self) -> Result<CreateProductCommand, ApiError> {
        let mut errors = FieldErrors::new();

        let name = errors.check("name", ProductName::new(self.name));
        let quantity = errors.check("quantity", Quantity::new(self.quantity));
        let price = errors.check("price", Price::new(self.price));

        match (name, quantity, price) {
            (Some(name), Some(quantity), Some(price)) => Ok(CreateProductCommand {
                name,
                quantity,
                price,
            }),
            _ => Err(errors.into_api_error()),
        }
    }
}
