//! Unified error handling for admin.
//!
//! Every failure leaves the API as the JSON failure envelope:
//! `{"success": false, "error": "...", "details": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mini_product_manager_core::{ApiResponse, ValidationError};
use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;
use crate::woocommerce::WooCommerceError;

/// Product operation an upstream failure happened in.
///
/// Decides how the failure is reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOperation {
    List,
    Create,
    Get,
    Update,
    Delete,
}

impl ProductOperation {
    /// Message used when nothing more specific is known.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch products",
            Self::Create => "Failed to create product",
            Self::Get => "Failed to fetch product",
            Self::Update => "Failed to update product",
            Self::Delete => "Failed to delete product",
        }
    }

    /// Whether upstream messages and status codes are passed through.
    ///
    /// List and create always answer 500 with the raw error text.
    const fn unwraps_upstream(self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Delete)
    }
}

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// WooCommerce credentials are missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Request payload failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// WooCommerce call failed.
    #[error("{source}")]
    WooCommerce {
        operation: ProductOperation,
        #[source]
        source: WooCommerceError,
    },

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Wrap an upstream failure with the operation it happened in.
    #[must_use]
    pub const fn woocommerce(operation: ProductOperation, source: WooCommerceError) -> Self {
        Self::WooCommerce { operation, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::WooCommerce { operation, source } => {
                if operation.unwraps_upstream() {
                    source
                        .status()
                        .and_then(|s| StatusCode::from_u16(s).ok())
                        .filter(|s| s.is_client_error() || s.is_server_error())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    /// Message placed in the envelope's `error` field.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::WooCommerce { operation, source } if operation.unwraps_upstream() => source
                .upstream_message()
                .map(String::from)
                .or_else(|| Some(source.to_string()).filter(|m| !m.is_empty()))
                .unwrap_or_else(|| operation.default_message().to_string()),
            _ => self.to_string(),
        }
    }

    /// Raw upstream error body placed in the envelope's `details` field.
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::WooCommerce { operation, source } if operation.unwraps_upstream() => {
                source.body().cloned()
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        let details = self.details();

        let (upstream_status, status_text, response_data) = match &self {
            Self::WooCommerce { source, .. } => (
                source.status(),
                source.status_text().map(String::from),
                source.body().map(Value::to_string),
            ),
            _ => (None, None, None),
        };

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = ?self,
                message = %message,
                response_data = ?response_data,
                upstream_status = ?upstream_status,
                status_text = ?status_text,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        } else {
            tracing::warn!(
                error = ?self,
                message = %message,
                response_data = ?response_data,
                upstream_status = ?upstream_status,
                status_text = ?status_text,
                status = status.as_u16(),
                "Admin request rejected"
            );
        }

        (status, Json(ApiResponse::<()>::failure(message, details))).into_response()
    }
}
