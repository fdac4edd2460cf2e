// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::{Arc, RwLock};

use axum::{
    http::header::CONTENT_TYPE, response::IntoResponse, routing::get, Extension, Router,
};
use prometheus_client::{encoding::text::encode, registry::Registry};
use tokio_util::sync::CancellationToken;

use super::{common::State, errors::MetricsError};
use crate::error::FoodcartError;

const CONTENT_TYPE_TEXT: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

pub async fn handler_prometheus_data(
    Extension(state): Extension<Arc<RwLock<State>>>,
) -> Result<impl IntoResponse, MetricsError> {
    let state_read = state.read().map_err(|_| MetricsError::Lock)?;
    let mut body = String::new();
    encode(&mut body, &state_read.registry).map_err(|_| MetricsError::Encode)?;

    Ok(([(CONTENT_TYPE, CONTENT_TYPE_TEXT)], body))
}

pub fn build_routes(registry: Registry) -> Router {
    let state = Arc::new(RwLock::new(State { registry }));

    Router::new()
        .route("/metrics", get(handler_prometheus_data))
        .layer(Extension(state))
}

/// Serve the metrics endpoint until `cancellation` fires.
pub async fn run_prometheus(
    registry: Registry,
    listen_address: &str,
    cancellation: CancellationToken,
) -> Result<(), FoodcartError> {
    let routes = build_routes(registry);
    let listener = tokio::net::TcpListener::bind(listen_address)
        .await
        .map_err(|error| {
            FoodcartError::InternalApi(format!(
                "Cannot bind metrics listener {}: {}",
                listen_address, error
            ))
        })?;
    log::info!("Prometheus metrics on {}", listen_address);
    axum::serve(listener, routes)
        .with_graceful_shutdown(cancellation.cancelled_owned())
        .await
        .map_err(|error| FoodcartError::InternalApi(format!("Metrics server error: {}", error)))
}
