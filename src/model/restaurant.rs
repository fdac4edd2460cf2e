// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Restaurants and their menus.
//!

use serde::{Deserialize, Serialize};

use crate::error::{FoodcartError, ValidationErrors};

/// Restaurant able to cook and deliver orders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// May be empty when the restaurant has no known address.
    pub address: String,
    pub contact_phone: String,
}

/// Restaurant creation request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_phone: String,
}

impl NewRestaurant {
    pub fn validate(&self) -> Result<(), FoodcartError> {
        let mut errors = ValidationErrors::new();
        super::check_text(&mut errors, "name", &self.name, 50, false);
        super::check_text(&mut errors, "address", &self.address, 100, true);
        super::check_text(&mut errors, "contact_phone", &self.contact_phone, 50, true);
        errors.into_result(())
    }
}

/// Menu entry of a restaurant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub restaurant_id: i64,
    pub product_id: i64,
    #[serde(default = "default_availability")]
    pub availability: bool,
}

fn default_availability() -> bool {
    true
}

/// Product row of the manager availability table.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProductAvailability {
    pub product: super::Product,
    /// One flag per restaurant, in the order of [`AvailabilityTable::restaurants`].
    pub availability: Vec<bool>,
}

/// Availability of every product across restaurants sorted by name.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AvailabilityTable {
    pub restaurants: Vec<Restaurant>,
    pub products: Vec<ProductAvailability>,
}
