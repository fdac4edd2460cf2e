// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use prometheus_client::{metrics::counter::Counter, registry::Registry};

/// Node counters.
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    pub orders_registered: Counter,
    pub geocoder_requests: Counter,
    pub geocoder_cache_hits: Counter,
    pub geocoder_failures: Counter,
}

impl Metrics {
    /// Create the counters and register them under the `foodcart` prefix.
    pub fn register(registry: &mut Registry) -> Self {
        let metrics = Self::default();
        let registry = registry.sub_registry_with_prefix("foodcart");
        registry.register(
            "orders_registered",
            "Orders accepted by the order endpoint",
            metrics.orders_registered.clone(),
        );
        registry.register(
            "geocoder_requests",
            "Requests sent to the geocoder",
            metrics.geocoder_requests.clone(),
        );
        registry.register(
            "geocoder_cache_hits",
            "Addresses resolved from the location cache",
            metrics.geocoder_cache_hits.clone(),
        );
        registry.register(
            "geocoder_failures",
            "Geocoder requests that failed",
            metrics.geocoder_failures.clone(),
        );
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn test_counters_are_exported() {
        let mut registry = Registry::default();
        let metrics = Metrics::register(&mut registry);
        metrics.orders_registered.inc();
        metrics.geocoder_cache_hits.inc_by(2);

        let mut body = String::new();
        encode(&mut body, &registry).unwrap();
        assert!(body.contains("foodcart_orders_registered_total 1"));
        assert!(body.contains("foodcart_geocoder_cache_hits_total 2"));
        assert!(body.contains("foodcart_geocoder_failures_total 0"));
    }
}
