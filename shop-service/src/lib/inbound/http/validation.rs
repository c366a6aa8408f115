//! Request shape checks shared by the handlers.
//!
//! Field errors are collected rather than failing on the first one, so a
//! client gets every problem with its request in a single 400.

use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::inbound::http::handlers::ApiError;

/// Unwrap a JSON body, turning any rejection into a 400.
pub fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest("Invalid body request".to_string())
    })
}

#[derive(Debug, Default)]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error of `result` against `field` and keep the value otherwise.
    pub fn check<T, E: Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(format!("{}: {}", field, e));
                None
            }
        }
    }

    /// Record a failed rule for `field`.
    pub fn reject(&mut self, field: &str, message: &str) {
        self.0.push(format!("{}: {}", field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_api_error(self) -> ApiError {
        if self.0.is_empty() {
            ApiError::BadRequest("Invalid request".to_string())
        } else {
            ApiError::BadRequest(self.0.join("; "))
        }
    }
}
