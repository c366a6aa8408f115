use std::sync::Arc;

use async_trait::async_trait;
use auth::policy;
use auth::policy::Operation;
use auth::SessionClaims;
use chrono::Utc;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::NewProduct;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::product::ports::ProductRepository;
use crate::domain::product::ports::ProductServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for product operations.
pub struct ProductService<PR>
where
    PR: ProductRepository,
{
    repository: Arc<PR>,
}

impl<PR> ProductService<PR>
where
    PR: ProductRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }

    async fn find_existing(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(*id))
    }

    fn deny(err: auth::AuthError, product: &Product, caller: &SessionClaims) -> ProductError {
        tracing::warn!(
            product_id = %product.id,
            owner_id = %product.owner_id,
            caller_id = caller.id,
            "Product mutation denied"
        );
        ProductError::from(err)
    }
}

#[async_trait]
impl<PR> ProductServicePort for ProductService<PR>
where
    PR: ProductRepository,
{
    async fn create_product(
        &self,
        command: CreateProductCommand,
        caller: &SessionClaims,
    ) -> Result<Product, ProductError> {
        policy::authorize(Some(caller), Operation::CreateProduct)?;

        let new_product = NewProduct {
            name: command.name,
            quantity: command.quantity,
            price: command.price,
            owner_id: UserId(caller.id),
        };

        let product = self.repository.create(new_product).await?;
        tracing::info!(
            product_id = %product.id,
            owner_id = %product.owner_id,
            "Product created"
        );

        Ok(product)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError> {
        policy::authorize(None, Operation::GetProduct)?;
        self.find_existing(id).await
    }

    async fn list_products(&self, caller: &SessionClaims) -> Result<Vec<Product>, ProductError> {
        policy::authorize(Some(caller), Operation::ListAllProducts)?;
        self.repository.list_all().await
    }

    async fn list_own_products(
        &self,
        caller: &SessionClaims,
    ) -> Result<Vec<Product>, ProductError> {
        policy::authorize(Some(caller), Operation::ListOwnProducts)?;
        self.repository.list_by_owner(&UserId(caller.id)).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
        caller: &SessionClaims,
    ) -> Result<Product, ProductError> {
        let mut product = self.find_existing(id).await?;

        policy::authorize(
            Some(caller),
            Operation::UpdateProduct {
                owner_id: product.owner_id.0,
            },
        )
        .map_err(|e| Self::deny(e, &product, caller))?;

        if let Some(name) = command.name {
            product.name = name;
        }

        if let Some(quantity) = command.quantity {
            product.quantity = quantity;
        }

        if let Some(price) = command.price {
            product.price = price;
        }

        product.updated_at = Utc::now();

        let updated = self.repository.update(product).await?;
        tracing::info!(product_id = %updated.id, "Product updated");

        Ok(updated)
    }

    async fn delete_product(
        &self,
        id: &ProductId,
        caller: &SessionClaims,
    ) -> Result<(), ProductError> {
        let product = self.find_existing(id).await?;

        policy::authorize(
            Some(caller),
            Operation::DeleteProduct {
                owner_id: product.owner_id.0,
            },
        )
        .map_err(|e| Self::deny(e, &product, caller))?;

        self.repository.delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");

        Ok(())
    }
}
