// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Orders.
//!
//! Orders placed by customers and the payload validation of the order
//! registration endpoint.
//!

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use phonenumber::{country, Mode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Price, Restaurant};
use crate::error::{FoodcartError, ValidationErrors};

/// Processing state of an order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    New,
    Process,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Process => "PROCESS",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = FoodcartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(OrderStatus::New),
            "PROCESS" => Ok(OrderStatus::Process),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            other => Err(FoodcartError::InvalidParameter(format!(
                "unknown order status '{}'",
                other
            ))),
        }
    }
}

/// Payment method chosen for an order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    #[default]
    None,
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::None => "NONE",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = FoodcartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(PaymentMethod::None),
            "CASH" => Ok(PaymentMethod::Cash),
            "CARD" => Ok(PaymentMethod::Card),
            other => Err(FoodcartError::InvalidParameter(format!(
                "unknown payment method '{}'",
                other
            ))),
        }
    }
}

/// Ordered product with the price snapshot taken at registration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
}

/// Customer order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    pub phonenumber: String,
    pub status: OrderStatus,
    pub payment: PaymentMethod,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub restaurant_id: Option<i64>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of quantity times price over the order items.
    ///
    /// # Errors
    ///
    /// * `FoodcartError::InternalApi` - The total does not fit in a `Price`
    ///
    pub fn total_price(&self) -> Result<Price, FoodcartError> {
        self.items
            .iter()
            .try_fold(Price::default(), |total, item| {
                item.price
                    .checked_mul(item.quantity)
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| {
                FoodcartError::InternalApi(format!("Total price of order {} overflows", self.id))
            })
    }

    /// Identifiers of the ordered products.
    pub fn product_ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.product_id).collect()
    }
}

/// Largest quantity accepted for one order line.
pub const MAX_QUANTITY: u32 = 2_147_483_647;

/// Line of a validated order registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: u32,
}

/// Validated order registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    /// Phone number in E.164 form.
    pub phonenumber: String,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Validate a raw registration payload.
    ///
    /// Every problem is reported at once, keyed by field. `product_exists`
    /// tells whether a product identifier refers to a known product.
    pub fn from_payload<F>(payload: &Value, product_exists: F) -> Result<Self, FoodcartError>
    where
        F: Fn(i64) -> bool,
    {
        let mut errors = ValidationErrors::new();
        let Some(object) = payload.as_object() else {
            errors.add("non_field_errors", "Invalid data. Expected a dictionary.");
            return Err(FoodcartError::Validation(errors));
        };

        let firstname = required_text(&mut errors, object, "firstname", 50);
        let lastname = required_text(&mut errors, object, "lastname", 50);
        let address = required_text(&mut errors, object, "address", 200);
        let phonenumber = required_text(&mut errors, object, "phonenumber", 20).and_then(|raw| {
            let normalized = normalize_phone_number(&raw);
            if normalized.is_none() {
                errors.add("phonenumber", "Enter a valid phone number.");
            }
            normalized
        });
        let items = order_items(&mut errors, object, &product_exists);

        match (firstname, lastname, address, phonenumber, items) {
            (Some(firstname), Some(lastname), Some(address), Some(phonenumber), Some(items))
                if errors.is_empty() =>
            {
                Ok(Self {
                    firstname,
                    lastname,
                    address,
                    phonenumber,
                    items,
                })
            }
            _ => Err(FoodcartError::Validation(errors)),
        }
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    object: &Map<String, Value>,
    field: &str,
    max_length: usize,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, "This field is required.");
            None
        }
        Some(Value::String(value)) => {
            let before = errors.field(field).map_or(0, <[String]>::len);
            super::check_text(errors, field, value, max_length, false);
            let after = errors.field(field).map_or(0, <[String]>::len);
            (before == after).then(|| value.trim().to_owned())
        }
        Some(_) => {
            errors.add(field, "Not a valid string.");
            None
        }
    }
}

fn order_items<F>(
    errors: &mut ValidationErrors,
    object: &Map<String, Value>,
    product_exists: &F,
) -> Option<Vec<NewOrderItem>>
where
    F: Fn(i64) -> bool,
{
    let products = match object.get("products") {
        None | Some(Value::Null) => {
            errors.add("products", "This field is required.");
            return None;
        }
        Some(Value::Array(products)) => products,
        Some(_) => {
            errors.add("products", "Expected a list of items.");
            return None;
        }
    };
    if products.is_empty() {
        errors.add("products", "This list may not be empty.");
        return None;
    }

    let mut items = Vec::with_capacity(products.len());
    for (index, entry) in products.iter().enumerate() {
        let prefix = format!("products[{}]", index);
        let Some(entry) = entry.as_object() else {
            errors.add(prefix, "Invalid data. Expected a dictionary.");
            continue;
        };

        let field = format!("{}.product", prefix);
        let product_id = match entry.get("product") {
            None | Some(Value::Null) => {
                errors.add(field, "This field is required.");
                None
            }
            Some(value) => match value.as_i64() {
                Some(id) if product_exists(id) => Some(id),
                Some(id) => {
                    errors.add(field, format!("Invalid pk \"{}\" - object does not exist.", id));
                    None
                }
                None => {
                    errors.add(field, "Incorrect type. Expected pk value.");
                    None
                }
            },
        };

        let field = format!("{}.quantity", prefix);
        let quantity = match entry.get("quantity") {
            None | Some(Value::Null) => Some(1),
            Some(value) => match value.as_i64() {
                Some(quantity) if quantity < 1 => {
                    errors.add(field, "Ensure this value is greater than or equal to 1.");
                    None
                }
                Some(quantity) => match u32::try_from(quantity) {
                    Ok(quantity) if quantity <= MAX_QUANTITY => Some(quantity),
                    _ => {
                        errors.add(
                            field,
                            format!("Ensure this value is less than or equal to {}.", MAX_QUANTITY),
                        );
                        None
                    }
                },
                None => {
                    errors.add(field, "A valid integer is required.");
                    None
                }
            },
        };

        if let (Some(product_id), Some(quantity)) = (product_id, quantity) {
            items.push(NewOrderItem {
                product_id,
                quantity,
            });
        }
    }
    Some(items)
}

/// Parse a phone number in the Russian numbering plan and format it as E.164.
///
/// Returns `None` for numbers that cannot be parsed or are not valid.
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let number = phonenumber::parse(Some(country::Id::RU), raw).ok()?;
    if !phonenumber::is_valid(&number) {
        return None;
    }
    Some(number.format().mode(Mode::E164).to_string())
}

/// Public view of a registered order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisteredOrder {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
}

/// Manager change request for an order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment: Option<PaymentMethod>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
}

impl OrderUpdate {
    /// Apply the change to an order, stamping the transition times.
    pub fn apply(&self, order: &mut Order, now: DateTime<Utc>) {
        if let Some(payment) = self.payment {
            order.payment = payment;
        }
        if let Some(comment) = &self.comment {
            order.comment = comment.clone();
        }
        let mut status = self.status;
        if let Some(restaurant_id) = self.restaurant_id {
            order.restaurant_id = Some(restaurant_id);
            if status.is_none() && order.status == OrderStatus::New {
                status = Some(OrderStatus::Process);
            }
        }
        if let Some(status) = status {
            order.status = status;
            match status {
                OrderStatus::Process if order.called_at.is_none() => order.called_at = Some(now),
                OrderStatus::Delivered if order.delivered_at.is_none() => {
                    order.delivered_at = Some(now)
                }
                _ => {}
            }
        }
    }
}

/// Candidate restaurant for an order with its distance to the customer.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SuitableRestaurant {
    pub restaurant: Restaurant,
    /// Distance in kilometers, `None` when an address could not be geocoded.
    pub distance: Option<f64>,
    pub distance_text: Option<String>,
}

/// Order as displayed on the manager dashboard.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub price: Price,
    pub suitable_restaurants: Vec<SuitableRestaurant>,
}
