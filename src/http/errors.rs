// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::FoodcartError;

impl IntoResponse for FoodcartError {
    fn into_response(self) -> Response {
        match self {
            FoodcartError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            FoodcartError::InvalidParameter(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            FoodcartError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": format!("Not found: {}", message) })))
                    .into_response()
            }
            FoodcartError::Geocoder(_) => {
                log::error!("{}", self);
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": self.to_string() }))).into_response()
            }
            FoodcartError::InternalApi(_) | FoodcartError::Database(_) | FoodcartError::Config(_) => {
                log::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": self.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for FoodcartError {
    fn from(rejection: JsonRejection) -> Self {
        FoodcartError::InvalidParameter(rejection.body_text())
    }
}

impl From<QueryRejection> for FoodcartError {
    fn from(rejection: QueryRejection) -> Self {
        FoodcartError::InvalidParameter(rejection.body_text())
    }
}

impl From<PathRejection> for FoodcartError {
    fn from(rejection: PathRejection) -> Self {
        FoodcartError::InvalidParameter(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrors;

    #[test]
    fn test_status_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("products", "This list may not be empty.");
        assert_eq!(
            FoodcartError::Validation(errors).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FoodcartError::NotFound("order 1".to_owned()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            FoodcartError::Geocoder("timeout".to_owned()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            FoodcartError::Database("locked".to_owned()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
