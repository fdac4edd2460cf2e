// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//!
//! # API
//!
//! This module contains the Foodcart Node API: the public catalog and order
//! registration, and the manager operations.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde_json::Value;

use crate::{
    database::SqliteStore,
    error::FoodcartError,
    geolocation::Locator,
    matching::{rank_by_distance, MenuIndex},
    model::{
        AvailabilityTable, Banner, MenuItem, NewCategory, NewOrder, NewProduct, NewRestaurant,
        OrderStatus, OrderUpdate, OrderView, Product, ProductAvailability, ProductCard,
        ProductCategory, RegisteredOrder, Restaurant,
    },
    prometheus::Metrics,
};

/// Foodcart Node API.
#[derive(Clone)]
pub struct FoodcartApi {
    store: SqliteStore,
    locator: Locator,
    metrics: Metrics,
    static_url: String,
    media_url: String,
}

/// Foodcart Node API implementation.
impl FoodcartApi {
    /// Create a new Foodcart Node API.
    pub fn new(
        store: SqliteStore,
        locator: Locator,
        metrics: Metrics,
        static_url: &str,
        media_url: &str,
    ) -> Self {
        Self {
            store,
            locator,
            metrics,
            static_url: static_url.to_owned(),
            media_url: media_url.to_owned(),
        }
    }

    /// Landing page banners.
    pub fn banners(&self) -> Vec<Banner> {
        [
            ("Burger", "burger.jpg", "Tasty Burger at your door step"),
            ("Spices", "food.jpg", "All Cuisines"),
            ("New York", "tasty.jpg", "Food is incomplete without a tasty dessert"),
        ]
        .into_iter()
        .map(|(title, image, text)| Banner {
            title: title.to_owned(),
            src: format!("{}{}", self.static_url, image),
            text: text.to_owned(),
        })
        .collect()
    }

    /// Products on sale in at least one restaurant.
    pub fn available_products(&self) -> Result<Vec<ProductCard>, FoodcartError> {
        Ok(self
            .store
            .list_available_products()?
            .into_iter()
            .map(|product| ProductCard::new(product, &self.media_url))
            .collect())
    }

    /// Register a customer order.
    ///
    /// # Arguments
    ///
    /// * `payload` - Raw JSON body of the order request
    ///
    /// # Errors
    ///
    /// * `FoodcartError::Validation` - Invalid fields, all reported together.
    /// * `FoodcartError::Database` - Database error
    ///
    pub fn register_order(&self, payload: &Value) -> Result<RegisteredOrder, FoodcartError> {
        let requested: Vec<i64> = payload
            .get("products")
            .and_then(Value::as_array)
            .map(|products| {
                products
                    .iter()
                    .filter_map(|entry| entry.get("product").and_then(Value::as_i64))
                    .collect()
            })
            .unwrap_or_default();
        let existing = self.store.existing_product_ids(&requested)?;

        let order = NewOrder::from_payload(payload, |id| existing.contains(&id))?;
        let order = self.store.create_order(&order, Utc::now())?;
        self.metrics.orders_registered.inc();
        log::info!("Order {} registered", order.id);

        Ok(RegisteredOrder {
            id: order.id,
            firstname: order.firstname,
            lastname: order.lastname,
            phonenumber: order.phonenumber,
            address: order.address,
        })
    }

    /// Orders with `status` and the restaurants able to cook each of them,
    /// nearest first.
    pub async fn list_orders(&self, status: OrderStatus) -> Result<Vec<OrderView>, FoodcartError> {
        let orders = self.store.list_orders(status)?;
        let restaurants: HashMap<i64, Restaurant> = self
            .store
            .list_restaurants()?
            .into_iter()
            .map(|restaurant| (restaurant.id, restaurant))
            .collect();
        let index = MenuIndex::new(&self.store.list_menu_items()?);

        let candidates: Vec<Vec<Restaurant>> = orders
            .iter()
            .map(|order| {
                index
                    .suitable_restaurants(&order.product_ids())
                    .into_iter()
                    .filter_map(|id| restaurants.get(&id).cloned())
                    .collect()
            })
            .collect();

        let addresses = orders
            .iter()
            .map(|order| order.address.as_str())
            .chain(candidates.iter().flatten().map(|r| r.address.as_str()));
        let coordinates = self.locator.coordinates_of(addresses).await?;

        orders
            .into_iter()
            .zip(candidates)
            .map(|(order, candidates)| {
                let order_coordinates = coordinates.get(order.address.trim()).copied().flatten();
                Ok(OrderView {
                    price: order.total_price()?,
                    suitable_restaurants: rank_by_distance(
                        order_coordinates,
                        candidates,
                        &coordinates,
                    ),
                    order,
                })
            })
            .collect()
    }

    /// Change an order on behalf of a manager.
    ///
    /// # Errors
    ///
    /// * `FoodcartError::NotFound` - Unknown order or restaurant
    /// * `FoodcartError::Validation` - The restaurant cannot cook the whole order
    ///
    pub fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<OrderView, FoodcartError> {
        let mut order = self.store.get_order(id)?;
        if let Some(restaurant_id) = update.restaurant_id {
            self.store.get_restaurant(restaurant_id)?;
            let index = MenuIndex::new(&self.store.list_menu_items()?);
            if !index
                .suitable_restaurants(&order.product_ids())
                .contains(&restaurant_id)
            {
                let mut errors = crate::error::ValidationErrors::new();
                errors.add("restaurant_id", "The restaurant cannot cook this order.");
                return Err(FoodcartError::Validation(errors));
            }
        }
        update.apply(&mut order, Utc::now());
        self.store.save_order(&order)?;
        log::info!("Order {} updated: status {}", order.id, order.status);
        Ok(OrderView {
            price: order.total_price()?,
            suitable_restaurants: Vec::new(),
            order,
        })
    }

    /// Availability of every product in every restaurant.
    pub fn products_availability(&self) -> Result<AvailabilityTable, FoodcartError> {
        let restaurants = self.store.list_restaurants()?;
        let available: HashSet<(i64, i64)> = self
            .store
            .list_menu_items()?
            .into_iter()
            .filter(|item| item.availability)
            .map(|item| (item.product_id, item.restaurant_id))
            .collect();
        let products = self
            .store
            .list_products()?
            .into_iter()
            .map(|product| ProductAvailability {
                availability: restaurants
                    .iter()
                    .map(|restaurant| available.contains(&(product.id, restaurant.id)))
                    .collect(),
                product,
            })
            .collect();
        Ok(AvailabilityTable {
            restaurants,
            products,
        })
    }

    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>, FoodcartError> {
        self.store.list_restaurants()
    }

    pub fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<Restaurant, FoodcartError> {
        restaurant.validate()?;
        self.store.create_restaurant(restaurant)
    }

    pub fn create_category(&self, category: &NewCategory) -> Result<ProductCategory, FoodcartError> {
        let mut errors = crate::error::ValidationErrors::new();
        crate::model::check_text(&mut errors, "name", &category.name, 50, false);
        errors.into_result(())?;
        self.store.create_category(category)
    }

    pub fn create_product(&self, product: &NewProduct) -> Result<Product, FoodcartError> {
        product.validate()?;
        self.store.create_product(product)
    }

    pub fn set_menu_item(&self, item: &MenuItem) -> Result<MenuItem, FoodcartError> {
        self.store.set_menu_item(item)
    }
}
