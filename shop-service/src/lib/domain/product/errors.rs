use auth::AuthError;
use thiserror::Error;

use crate::domain::product::models::ProductId;

/// Error type for ProductId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid product ID format: {0}")]
    InvalidFormat(String),
}

/// Error type for ProductName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductNameError {
    #[error("Product name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Product name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Quantity must be at least {min}, got {actual}")]
    BelowMinimum { min: i32, actual: i64 },

    #[error("Quantity too large: {0}")]
    TooLarge(i64),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PriceError {
    #[error("Price must be at least {min}, got {actual}")]
    BelowMinimum { min: f64, actual: f64 },

    #[error("Price must be a finite number")]
    NotFinite,
}

/// Top-level error type for all product-related operations
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid product ID: {0}")]
    InvalidProductId(#[from] ProductIdError),

    #[error("Invalid product name: {0}")]
    InvalidName(#[from] ProductNameError),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Product not found: {0}")]
    NotFound(ProductId),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for ProductError {
    fn from(err: anyhow::Error) -> Self {
        ProductError::Unknown(err.to_string())
    }
}
