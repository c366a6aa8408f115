use async_trait::async_trait;
use auth::SessionClaims;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::NewProduct;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::user::models::UserId;

/// Port for product domain service operations.
///
/// Every operation except `get_product` takes the caller's validated claims
/// and is gated by the authorization policy.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// Create a product owned by the caller.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_product(
        &self,
        command: CreateProductCommand,
        caller: &SessionClaims,
    ) -> Result<Product, ProductError>;

    /// Retrieve a product. Public.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError>;

    /// List every product. Admin only.
    ///
    /// # Errors
    /// * `Auth(InsufficientRole)` - Caller is not an admin
    /// * `DatabaseError` - Database operation failed
    async fn list_products(&self, caller: &SessionClaims) -> Result<Vec<Product>, ProductError>;

    /// List the products owned by the caller.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_own_products(
        &self,
        caller: &SessionClaims,
    ) -> Result<Vec<Product>, ProductError>;

    /// Apply a partial update. Only the owner may update.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `Auth(OwnershipViolation)` - Caller does not own the product
    /// * `DatabaseError` - Database operation failed
    async fn update_product(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
        caller: &SessionClaims,
    ) -> Result<Product, ProductError>;

    /// Delete a product. Only the owner may delete.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `Auth(OwnershipViolation)` - Caller does not own the product
    /// * `DatabaseError` - Database operation failed
    async fn delete_product(
        &self,
        id: &ProductId,
        caller: &SessionClaims,
    ) -> Result<(), ProductError>;
}

/// Persistence port for products.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// Insert a product and return it with its store-assigned id.
    async fn create(&self, product: NewProduct) -> Result<Product, ProductError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Product>, ProductError>;

    /// Persist changed fields. The owner column is never written.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn update(&self, product: Product) -> Result<Product, ProductError>;

    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn delete(&self, id: &ProductId) -> Result<(), ProductError>;
}
