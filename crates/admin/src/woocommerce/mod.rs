//! WooCommerce REST API client.
//!
//! The store is the only source of truth for products: this module forwards
//! every read and write and keeps nothing locally.
//!
//! # API Reference
//!
//! - Base URL: `{WC_URL}/wp-json/wc/v3`
//! - Authentication over HTTPS: HTTP Basic with consumer key/secret
//! - Authentication over HTTP: one-legged OAuth 1.0a (`HMAC-SHA256`) in the query string
//! - Pagination totals: `X-WP-Total` and `X-WP-TotalPages` response headers
//!
//! # Example
//!
//! ```rust,ignore
//! use mini_product_manager_admin::woocommerce::WooCommerceClient;
//!
//! let client = WooCommerceClient::new(&config)?;
//! let page = client.list_products(1, 10).await?;
//! client.delete_product(ProductId::new(7), true).await?;
//! ```

mod client;
mod oauth;
mod types;

pub use client::WooCommerceClient;
pub use types::ProductPage;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when interacting with the WooCommerce API.
#[derive(Debug, Error)]
pub enum WooCommerceError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Api {
        status: u16,
        status_text: String,
        /// Response body, when it was JSON.
        body: Option<Value>,
    },

    /// Failed to parse a success response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Could not build the request URL.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Could not compute the OAuth signature.
    #[error("Signing error: {0}")]
    Signing(String),
}

impl WooCommerceError {
    /// HTTP status reported by the store, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) | Self::Url(_) | Self::Signing(_) => None,
        }
    }

    /// Reason phrase of the failed response.
    #[must_use]
    pub fn status_text(&self) -> Option<&str> {
        match self {
            Self::Api { status_text, .. } => Some(status_text),
            _ => None,
        }
    }

    /// Raw JSON error body returned by the store.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// The most specific message the store supplied: its `message` field,
    /// then its `error` field.
    #[must_use]
    pub fn upstream_message(&self) -> Option<&str> {
        let body = self.body()?;
        ["message", "error"]
            .into_iter()
            .find_map(|field| body.get(field).and_then(Value::as_str).filter(|m| !m.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn api_error(body: Option<Value>) -> WooCommerceError {
        WooCommerceError::Api {
            status: 404,
            status_text: "Not Found".to_string(),
            body,
        }
    }

    #[test]
    fn test_api_error_display_matches_http_client_wording() {
        assert_eq!(
            api_error(None).to_string(),
            "Request failed with status code 404"
        );
    }

    #[test]
    fn test_upstream_message_prefers_message_field() {
        let err = api_error(Some(json!({"message": "Invalid ID.", "error": "other"})));
        assert_eq!(err.upstream_message(), Some("Invalid ID."));
    }

    #[test]
    fn test_upstream_message_falls_back_to_error_field() {
        let err = api_error(Some(json!({"message": "", "error": "rest_forbidden"})));
        assert_eq!(err.upstream_message(), Some("rest_forbidden"));
    }

    #[test]
    fn test_upstream_message_absent() {
        assert_eq!(api_error(None).upstream_message(), None);
        assert_eq!(api_error(Some(json!({"code": "x"}))).upstream_message(), None);
        assert_eq!(api_error(Some(json!("plain"))).upstream_message(), None);
    }

    #[test]
    fn test_status_accessors() {
        let err = api_error(Some(json!({})));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.status_text(), Some("Not Found"));
        assert_eq!(WooCommerceError::Parse("bad".to_string()).status(), None);
    }
}
