use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::product::errors::PriceError;
use crate::domain::product::errors::ProductIdError;
use crate::domain::product::errors::ProductNameError;
use crate::domain::product::errors::QuantityError;
use crate::domain::user::models::UserId;

/// Product unique identifier value object, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Parse a product ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, ProductIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(ProductId(id)),
            Ok(id) => Err(ProductIdError::InvalidFormat(format!(
                "{} is not positive",
                id
            ))),
            Err(e) => Err(ProductIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product aggregate entity.
///
/// `owner_id` is stamped from the creating session and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub quantity: Quantity,
    pub price: Price,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product data that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub quantity: Quantity,
    pub price: Price,
    pub owner_id: UserId,
}

/// Product name value type (3-25 characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName(String);

impl ProductName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 25;

    pub fn new(name: String) -> Result<Self, ProductNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            Err(ProductNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(ProductNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stock quantity, at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(i32);

impl Quantity {
    const MIN: i32 = 1;

    pub fn new(quantity: i64) -> Result<Self, QuantityError> {
        if quantity < i64::from(Self::MIN) {
            return Err(QuantityError::BelowMinimum {
                min: Self::MIN,
                actual: quantity,
            });
        }
        i32::try_from(quantity)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge(quantity))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Unit price, a finite number of at least one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(f64);

impl Price {
    const MIN: f64 = 1.0;

    pub fn new(price: f64) -> Result<Self, PriceError> {
        if !price.is_finite() {
            Err(PriceError::NotFinite)
        } else if price < Self::MIN {
            Err(PriceError::BelowMinimum {
                min: Self::MIN,
                actual: price,
            })
        } else {
            Ok(Self(price))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductCommand {
    pub name: ProductName,
    pub quantity: Quantity,
    pub price: Price,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProductCommand {
    pub name: Option<ProductName>,
    pub quantity: Option<Quantity>,
    pub price: Option<Price>,
}
