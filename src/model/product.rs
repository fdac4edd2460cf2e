// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Products and categories.
//!

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FoodcartError;

/// Money amount with two decimal places, kept as minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    /// Highest product price, `999999.99`.
    pub const MAX: Price = Price(99_999_999);

    pub fn from_minor_units(units: i64) -> Self {
        Self(units)
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Price of `quantity` units, `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Price> {
        self.0.checked_mul(i64::from(quantity)).map(Price)
    }

    pub fn checked_add(self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, units / 100, units % 100)
    }
}

impl FromStr for Price {
    type Err = FoodcartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FoodcartError::InvalidParameter(format!("invalid price '{}'", s));
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty()
            || fraction.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let units = whole
            .checked_mul(100)
            .and_then(|units| units.checked_add(fraction))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -units } else { units }))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(i64),
            Number(f64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Price::from_str(&text).map_err(serde::de::Error::custom),
            Raw::Integer(value) => value
                .checked_mul(100)
                .map(Price)
                .ok_or_else(|| serde::de::Error::custom("price out of range")),
            Raw::Number(value) if !value.is_finite() => {
                Err(serde::de::Error::custom("price must be finite"))
            }
            Raw::Number(value) => {
                // Beyond this bound the cast to i64 would saturate.
                let units = (value * 100.0).round();
                if units.abs() < 9.0e18 {
                    Ok(Price(units as i64))
                } else {
                    Err(serde::de::Error::custom("price out of range"))
                }
            }
        }
    }
}

/// Product category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
}

/// Category creation request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewCategory {
    pub name: String,
}

/// Product sold by restaurants.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<ProductCategory>,
    pub price: Price,
    /// Image path relative to the media url.
    pub image: String,
    pub special_status: bool,
    pub description: String,
}

/// Product creation request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub special_status: bool,
    #[serde(default)]
    pub description: String,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), FoodcartError> {
        let mut errors = crate::error::ValidationErrors::new();
        super::check_text(&mut errors, "name", &self.name, 50, false);
        super::check_text(&mut errors, "description", &self.description, 200, true);
        if self.price.minor_units() < 0 {
            errors.add("price", "Ensure this value is greater than or equal to 0.");
        } else if self.price > Price::MAX {
            errors.add("price", "Ensure that there are no more than 8 digits in total.");
        }
        errors.into_result(())
    }
}

/// Catalog entry as exposed to customers.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub price: Price,
    pub special_status: bool,
    pub description: String,
    pub category: Option<ProductCategory>,
    pub image: String,
}

impl ProductCard {
    /// Build the card resolving the image against the media url.
    pub fn new(product: Product, media_url: &str) -> Self {
        Self {
            image: format!("{}{}", media_url, product.image),
            id: product.id,
            name: product.name,
            price: product.price,
            special_status: product.special_status,
            description: product.description,
            category: product.category,
        }
    }
}

/// Promotional banner on the landing page.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub src: String,
    pub text: String,
}
