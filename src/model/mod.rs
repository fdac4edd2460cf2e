// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Data model for Foodcart Node.
//!
//! This module contains the data model for the Foodcart Node.
//!
//! ## Data model
//!
//! The data model is composed of the following elements:
//!
//! * Restaurants and their menu items.
//! * Products and product categories.
//! * Orders and order items.
//! * Geocoded locations.
//!

pub mod location;
pub mod order;
pub mod product;
pub mod restaurant;

pub use location::*;
pub use order::*;
pub use product::*;
pub use restaurant::*;

use crate::error::ValidationErrors;

/// Check a text field against blank and length rules.
pub(crate) fn check_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max_length: usize,
    allow_blank: bool,
) {
    if !allow_blank && value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
    } else if value.chars().count() > max_length {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_length),
        );
    }
}
