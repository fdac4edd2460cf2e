// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Geolocation.
//!
//! Geocoding of addresses, the location cache and distances between points.
//!

pub mod distance;
pub mod geocoder;
pub mod locator;

pub use distance::{distance_km, distance_text};
pub use geocoder::{Geocoder, YandexGeocoder};
pub use locator::Locator;
