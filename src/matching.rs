// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Restaurant matching.
//!
//! Finds the restaurants able to cook a whole order and ranks them by their
//! distance to the customer.
//!

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

use crate::{
    geolocation::{distance_km, distance_text},
    model::{Coordinates, MenuItem, Restaurant, SuitableRestaurant},
};

/// Restaurants selling each product, built from available menu items only.
#[derive(Debug, Default, Clone)]
pub struct MenuIndex {
    restaurants_by_product: HashMap<i64, BTreeSet<i64>>,
}

impl MenuIndex {
    pub fn new(menu: &[MenuItem]) -> Self {
        let mut restaurants_by_product: HashMap<i64, BTreeSet<i64>> = HashMap::new();
        for item in menu.iter().filter(|item| item.availability) {
            restaurants_by_product
                .entry(item.product_id)
                .or_default()
                .insert(item.restaurant_id);
        }
        Self {
            restaurants_by_product,
        }
    }

    /// Restaurants with every product of the order available.
    ///
    /// An order without products has no suitable restaurant.
    pub fn suitable_restaurants(&self, products: &[i64]) -> BTreeSet<i64> {
        let mut products = products.iter();
        let Some(first) = products.next() else {
            return BTreeSet::new();
        };
        let mut suitable = self.restaurants_for(*first);
        for product in products {
            if suitable.is_empty() {
                break;
            }
            let restaurants = self.restaurants_for(*product);
            suitable.retain(|restaurant| restaurants.contains(restaurant));
        }
        suitable
    }

    fn restaurants_for(&self, product: i64) -> BTreeSet<i64> {
        self.restaurants_by_product
            .get(&product)
            .cloned()
            .unwrap_or_default()
    }
}

/// Sort candidates nearest first.
///
/// `coordinates` gives the location of the customer and each candidate by
/// address; candidates whose distance cannot be computed come last. Equal
/// distances are ordered by name.
pub fn rank_by_distance(
    order_coordinates: Option<Coordinates>,
    candidates: Vec<Restaurant>,
    coordinates: &HashMap<String, Option<Coordinates>>,
) -> Vec<SuitableRestaurant> {
    let mut ranked: Vec<SuitableRestaurant> = candidates
        .into_iter()
        .map(|restaurant| {
            let restaurant_coordinates = coordinates
                .get(restaurant.address.trim())
                .copied()
                .flatten();
            let distance = order_coordinates
                .zip(restaurant_coordinates)
                .map(|(from, to)| distance_km(from, to));
            SuitableRestaurant {
                distance_text: distance.map(distance_text),
                distance,
                restaurant,
            }
        })
        .collect();
    ranked.sort_by(|a, b| {
        let by_distance = match (a.distance, b.distance) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_distance.then_with(|| a.restaurant.name.cmp(&b.restaurant.name))
    });
    ranked
}
