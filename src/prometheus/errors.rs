// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures of the metrics endpoint.
#[derive(Debug)]
pub enum MetricsError {
    /// Registry lock poisoned.
    Lock,
    /// Text encoding failed.
    Encode,
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        let message = match self {
            MetricsError::Lock => "Error: locking prometheus registry.",
            MetricsError::Encode => "Error: encoding prometheus data.",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
