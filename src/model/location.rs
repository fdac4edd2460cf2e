// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Geocoded locations.
//!

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point on the globe, in degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Cached geocoder answer for an address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub address: String,
    /// `None` when the geocoder did not find the address.
    pub coordinates: Option<Coordinates>,
    /// Time of the geocoder request.
    pub updated_at: DateTime<Utc>,
}
