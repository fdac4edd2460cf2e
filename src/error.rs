// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Foodcart Node errors.
//!
//! This module contains the different errors that can be returned by the Foodcart Node.
//!

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Foodcart Node errors.
#[derive(Error, Debug, Clone)]
pub enum FoodcartError {
    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Field level validation errors.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),
    /// Entity not found.
    #[error("Not found: {0}")]
    NotFound(String),
    /// API error
    #[error("API error: {0}")]
    InternalApi(String),
    /// Database error
    #[error("Database error: {0}")]
    Database(String),
    /// Geocoder error
    #[error("Geocoder error: {0}")]
    Geocoder(String),
    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Validation messages grouped by field name.
///
/// Serialized as `{"field": ["message", ...]}`. Items of a list field are
/// addressed as `field[index].subfield`.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages registered for a field.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when no message was collected.
    pub fn into_result<T>(self, value: T) -> Result<T, FoodcartError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(FoodcartError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", fields.join("; "))
    }
}

impl From<rusqlite::Error> for FoodcartError {
    fn from(error: rusqlite::Error) -> Self {
        FoodcartError::Database(error.to_string())
    }
}

impl From<reqwest::Error> for FoodcartError {
    fn from(error: reqwest::Error) -> Self {
        FoodcartError::Geocoder(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_grouped_by_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result(()).is_ok());
        errors.add("products", "This list may not be empty.");
        errors.add("firstname", "This field is required.");
        errors.add("products", "Second message.");

        assert_eq!(errors.field("products").unwrap().len(), 2);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "firstname": ["This field is required."],
                "products": ["This list may not be empty.", "Second message."],
            })
        );
        assert!(matches!(
            errors.into_result(()),
            Err(FoodcartError::Validation(_))
        ));
    }
}
