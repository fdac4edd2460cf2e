// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Prometheus metrics.
//!
//! Node counters and the HTTP endpoint exporting them in text format.
//!

mod common;
mod errors;
pub mod metrics;
pub mod server;

pub use metrics::Metrics;
