// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::Deserialize;

/// Database settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum DbSettings {
    /// Configuration for a SQLite database.
    Sqlite(String),
}

/// HTTP API settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HttpSettings {
    /// Address the API listens on.
    pub listen_address: String,
    /// Prefix of static assets (banners).
    pub static_url: String,
    /// Prefix of uploaded media (product images).
    pub media_url: String,
}

/// Geocoder client settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Metrics endpoint settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PrometheusSettings {
    pub enabled: bool,
    pub listen_address: String,
}

/// Specific settings for the node.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FoodcartSettings {
    /// Database settings.
    pub db: DbSettings,
    pub http: HttpSettings,
    pub geocoder: GeocoderSettings,
    pub prometheus: PrometheusSettings,
}

impl Default for FoodcartSettings {
    fn default() -> Self {
        crate::config::params::Params::default().into()
    }
}
