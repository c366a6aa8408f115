use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Price;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::Quantity;
use crate::domain::product::models::UpdateProductCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::parse_body;
use crate::inbound::http::validation::FieldErrors;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    fn try_into_command(self) -> Result<UpdateProductCommand, ApiError> {
        let mut errors = FieldErrors::new();

        let name = errors.check("name", self.name.map(ProductName::new).transpose());
        let quantity = errors.check("quantity", self.quantity.map(Quantity::new).transpose());
        let price = errors.check("price", self.price.map(Price::new).transpose());

        match (name, quantity, price) {
            (Some(name), Some(quantity), Some(price)) => Ok(UpdateProductCommand {
                name,
                quantity,
                price,
            }),
            _ => Err(errors.into_api_error()),
        }
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let product_id = ProductId::from_string(&id).map_err(ProductError::from)?;
    let command = parse_body(payload)?.try_into_command()?;

    state
        .product_service
        .update_product(&product_id, command, &claims)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}
