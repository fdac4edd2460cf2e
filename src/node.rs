// Copyright 2024 Antonio Estévez
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use crate::{
    database::SqliteStore,
    error::FoodcartError,
    geolocation::{Geocoder, Locator, YandexGeocoder},
    http::build_routes,
    prometheus::{server::run_prometheus, Metrics},
    settings::{DbSettings, FoodcartSettings},
    FoodcartApi,
};

use futures::Future;
use prometheus_client::registry::Registry;
use tokio_util::sync::CancellationToken;

/// Foodcart node with SQLite database.
pub struct FoodcartNode {
    /// Foodcart API.
    api: FoodcartApi,
    /// Node settings.
    settings: FoodcartSettings,
    /// Metrics registry, served while the node runs.
    registry: Registry,
    /// Cancellation token.
    cancellation: CancellationToken,
}

/// Implementation for `FoodcartNode`.
impl FoodcartNode {
    /// Build a new `FoodcartNode` geocoding with the configured Yandex geocoder.
    ///
    /// # Arguments
    ///
    /// * `settings` - Foodcart settings
    ///
    /// # Returns
    ///
    /// * `Result<Self, FoodcartError>` - `FoodcartNode`
    ///
    pub fn build(settings: FoodcartSettings) -> Result<Self, FoodcartError> {
        let geocoder = YandexGeocoder::new(&settings.geocoder)?;
        Self::build_with_geocoder(settings, Arc::new(geocoder))
    }

    /// Build a new `FoodcartNode` with the provided geocoder.
    pub fn build_with_geocoder(
        settings: FoodcartSettings,
        geocoder: Arc<dyn Geocoder>,
    ) -> Result<Self, FoodcartError> {
        let DbSettings::Sqlite(path) = &settings.db;
        let store = SqliteStore::open(path)?;
        let mut registry = Registry::default();
        let metrics = Metrics::register(&mut registry);
        let locator = Locator::new(store.clone(), geocoder, metrics.clone());
        let api = FoodcartApi::new(
            store,
            locator,
            metrics,
            &settings.http.static_url,
            &settings.http.media_url,
        );
        Ok(Self {
            api,
            settings,
            registry,
            cancellation: CancellationToken::new(),
        })
    }

    /// Get the Foodcart API.
    pub fn api(&self) -> &FoodcartApi {
        &self.api
    }

    /// Bind the node to the provided shutdown signal.
    ///
    /// # Arguments
    ///
    /// * `shutdown_signal` - Shutdown signal
    ///
    pub fn bind_with_shutdown(&self, shutdown_signal: impl Future + Send + 'static) {
        let cancellation_token = self.cancellation.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            log::info!("Shutdown signal received");
            cancellation_token.cancel();
        });
    }

    /// Run the node.
    ///
    /// Serves the HTTP API, and the metrics endpoint when enabled, until the
    /// shutdown signal fires.
    ///
    /// # Errors
    ///
    /// * `FoodcartError::InternalApi` - A listener cannot be bound or the server failed
    ///
    pub async fn run(self) -> Result<(), FoodcartError> {
        let listen_address = self.settings.http.listen_address.clone();
        let listener = tokio::net::TcpListener::bind(&listen_address)
            .await
            .map_err(|error| {
                FoodcartError::InternalApi(format!(
                    "Cannot bind API listener {}: {}",
                    listen_address, error
                ))
            })?;

        let metrics_task = if self.settings.prometheus.enabled {
            let address = self.settings.prometheus.listen_address.clone();
            let cancellation = self.cancellation.clone();
            let registry = self.registry;
            Some(tokio::spawn(async move {
                run_prometheus(registry, &address, cancellation).await
            }))
        } else {
            None
        };

        log::info!("Foodcart API on {}", listen_address);
        let served = axum::serve(listener, build_routes(self.api))
            .with_graceful_shutdown(self.cancellation.clone().cancelled_owned())
            .await
            .map_err(|error| FoodcartError::InternalApi(format!("API server error: {}", error)));
        self.cancellation.cancel();

        if let Some(task) = metrics_task {
            match task.await {
                Ok(Err(error)) => log::warn!("{}", error),
                Err(error) => log::warn!("Metrics task failed: {}", error),
                Ok(Ok(())) => {}
            }
        }
        log::info!("Stopped");
        served
    }
}

#[cfg(test)]
pub mod tests {

    use super::*;
    use crate::geolocation::geocoder::tests::FakeGeocoder;
    use std::time::Duration;

    fn settings() -> FoodcartSettings {
        let mut settings = FoodcartSettings::default();
        settings.db = DbSettings::Sqlite(":memory:".to_owned());
        settings.http.listen_address = "127.0.0.1:0".to_owned();
        settings.prometheus.listen_address = "127.0.0.1:0".to_owned();
        settings
    }

    #[tokio::test]
    async fn test_sqlite_node() {
        let node = FoodcartNode::build(settings());
        assert!(node.is_ok());
        let node = node.unwrap();
        assert_eq!(node.api().banners().len(), 3);
        node.bind_with_shutdown(tokio::time::sleep(Duration::from_millis(100)));
        assert!(node.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_file_database_node() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("foodcart.sqlite3");
        let mut settings = settings();
        settings.db = DbSettings::Sqlite(path.to_str().unwrap().to_owned());
        settings.prometheus.enabled = false;
        let node =
            FoodcartNode::build_with_geocoder(settings, Arc::new(FakeGeocoder::default())).unwrap();
        assert!(node.api().list_restaurants().unwrap().is_empty());
        node.bind_with_shutdown(async {});
        assert!(node.run().await.is_ok());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_invalid_listen_address() {
        let mut settings = settings();
        settings.http.listen_address = "not an address".to_owned();
        let node = FoodcartNode::build(settings).unwrap();
        assert!(matches!(node.run().await, Err(FoodcartError::InternalApi(_))));
    }
}
