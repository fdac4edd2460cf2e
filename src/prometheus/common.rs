// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use prometheus_client::registry::Registry;

/// Shared state of the metrics endpoint.
pub struct State {
    pub registry: Registry,
}
