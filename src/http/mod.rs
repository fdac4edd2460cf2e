// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # HTTP surface.
//!
//! JSON endpoints of the public API (`/api/...`) and of the manager
//! dashboard (`/manager/...`).
//!

mod errors;
pub mod routes;

pub use routes::build_routes;
