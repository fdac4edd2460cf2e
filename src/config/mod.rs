// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Configuration.
//!
//! Settings are read from an optional file and from `FOODCART__*`
//! environment variables.
//!

mod build;
pub(crate) mod params;

pub use build::build_config;
