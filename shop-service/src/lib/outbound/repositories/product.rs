use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::NewProduct;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::Quantity;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::models::UserId;

const PRODUCT_COLUMNS: &str = "id, name, quantity, price, user_id, created_at, updated_at";

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &PgRow) -> Result<Product, ProductError> {
        let quantity: i32 = row.try_get("quantity").map_err(database_error)?;

        Ok(Product {
            id: ProductId(row.try_get("id").map_err(database_error)?),
            name: ProductName::new(row.try_get("name").map_err(database_error)?)?,
            quantity: Quantity::new(i64::from(quantity))?,
            price: Price::new(row.try_get("price").map_err(database_error)?)?,
            owner_id: UserId(row.try_get("user_id").map_err(database_error)?),
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

fn database_error(e: sqlx::Error) -> ProductError {
    ProductError::DatabaseError(e.to_string())
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, ProductError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, quantity, price, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product.name.as_str())
        .bind(product.quantity.value())
        .bind(product.price.value())
        .bind(product.owner_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Self::row_to_product(&row)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(Self::row_to_product).collect()
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products WHERE user_id = $1 ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(owner_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(Self::row_to_product).collect()
    }

    async fn update(&self, product: Product) -> Result<Product, ProductError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2, quantity = $3, price = $4, updated_at = $5
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product.id.0)
        .bind(product.name.as_str())
        .bind(product.quantity.value())
        .bind(product.price.value())
        .bind(product.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        match row {
            Some(row) => Self::row_to_product(&row),
            None => Err(ProductError::NotFound(product.id)),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductError> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(*id));
        }

        Ok(())
    }
}
