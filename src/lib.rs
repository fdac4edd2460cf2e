// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod api;
pub mod config;
mod database;
pub mod error;
pub mod geolocation;
pub mod http;
pub mod matching;
pub mod model;
pub mod node;
mod prometheus;
pub mod settings;
pub use clap;

pub use api::FoodcartApi;
pub use database::SqliteStore;
pub use node::FoodcartNode;
pub use prometheus::Metrics;
