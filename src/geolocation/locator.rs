// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Cached address resolution.
//!
//! Every address is sent to the geocoder at most once; answers, including
//! "not found", are kept in the `locations` table.
//!

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use futures::future::join_all;

use super::Geocoder;
use crate::{
    database::SqliteStore,
    error::FoodcartError,
    model::{Coordinates, Location},
    prometheus::Metrics,
};

/// Geocoder front with a persistent cache.
#[derive(Clone)]
pub struct Locator {
    store: SqliteStore,
    geocoder: Arc<dyn Geocoder>,
    metrics: Metrics,
}

impl Locator {
    pub fn new(store: SqliteStore, geocoder: Arc<dyn Geocoder>, metrics: Metrics) -> Self {
        Self {
            store,
            geocoder,
            metrics,
        }
    }

    /// Coordinates of an address, `None` when unknown.
    ///
    /// Geocoder failures are logged and not cached, so the address is retried
    /// on the next call.
    ///
    /// # Errors
    ///
    /// * `FoodcartError::Database` - cache read or write failed
    ///
    pub async fn coordinates(&self, address: &str) -> Result<Option<Coordinates>, FoodcartError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        if let Some(location) = self.store.get_location(address)? {
            log::debug!("Location cache hit for '{}'", address);
            self.metrics.geocoder_cache_hits.inc();
            return Ok(location.coordinates);
        }

        log::debug!("Location cache miss for '{}'", address);
        self.metrics.geocoder_requests.inc();
        let coordinates = match self.geocoder.fetch_coordinates(address).await {
            Ok(coordinates) => coordinates,
            Err(error) => {
                log::warn!("Cannot geocode '{}': {}", address, error);
                self.metrics.geocoder_failures.inc();
                return Ok(None);
            }
        };
        self.store.put_location(&Location {
            address: address.to_owned(),
            coordinates,
            updated_at: Utc::now(),
        })?;
        Ok(coordinates)
    }

    /// Resolve several addresses concurrently, each distinct address once.
    ///
    /// The returned map is keyed by the trimmed address.
    pub async fn coordinates_of<'a, I>(
        &self,
        addresses: I,
    ) -> Result<HashMap<String, Option<Coordinates>>, FoodcartError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut distinct: Vec<&str> = addresses.into_iter().map(str::trim).collect();
        distinct.sort_unstable();
        distinct.dedup();

        let resolved = join_all(distinct.iter().map(|address| self.coordinates(address))).await;
        distinct
            .into_iter()
            .zip(resolved)
            .map(|(address, coordinates)| Ok((address.to_owned(), coordinates?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::geocoder::tests::FakeGeocoder;

    fn locator(geocoder: Arc<FakeGeocoder>) -> (Locator, Metrics) {
        let store = SqliteStore::open(":memory:").unwrap();
        let metrics = Metrics::default();
        (Locator::new(store, geocoder, metrics.clone()), metrics)
    }

    #[tokio::test]
    async fn test_address_geocoded_once() {
        let moscow = Coordinates::new(55.75, 37.61);
        let geocoder = Arc::new(FakeGeocoder::with_places(&[("Moscow", moscow)]));
        let (locator, metrics) = locator(geocoder.clone());

        assert_eq!(locator.coordinates("Moscow").await.unwrap(), Some(moscow));
        assert_eq!(locator.coordinates(" Moscow ").await.unwrap(), Some(moscow));
        assert_eq!(geocoder.calls(), vec!["Moscow".to_owned()]);
        assert_eq!(metrics.geocoder_requests.get(), 1);
        assert_eq!(metrics.geocoder_cache_hits.get(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_cached() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let (locator, _) = locator(geocoder.clone());

        assert_eq!(locator.coordinates("Atlantis").await.unwrap(), None);
        assert_eq!(locator.coordinates("Atlantis").await.unwrap(), None);
        assert_eq!(geocoder.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let geocoder = Arc::new(FakeGeocoder {
            failing: vec!["Moscow".to_owned()],
            ..Default::default()
        });
        let (locator, metrics) = locator(geocoder.clone());

        assert_eq!(locator.coordinates("Moscow").await.unwrap(), None);
        assert_eq!(locator.coordinates("Moscow").await.unwrap(), None);
        assert_eq!(geocoder.calls().len(), 2);
        assert_eq!(metrics.geocoder_failures.get(), 2);
    }

    #[tokio::test]
    async fn test_blank_address_skips_geocoder() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let (locator, _) = locator(geocoder.clone());

        assert_eq!(locator.coordinates("   ").await.unwrap(), None);
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_coordinates_of_distinct_addresses() {
        let moscow = Coordinates::new(55.75, 37.61);
        let geocoder = Arc::new(FakeGeocoder::with_places(&[("Moscow", moscow)]));
        let (locator, _) = locator(geocoder.clone());

        let resolved = locator
            .coordinates_of(["Moscow", " Moscow", "Atlantis"])
            .await
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["Moscow"], Some(moscow));
        assert_eq!(resolved["Atlantis"], None);
        assert_eq!(geocoder.calls().len(), 2);
    }
}
