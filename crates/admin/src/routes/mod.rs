//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness
//! GET    /health/ready         - Readiness (WooCommerce configured)
//!
//! GET    /                     - Product manager page
//!
//! GET    /api/products         - List products (?page=&per_page=)
//! POST   /api/products         - Create product
//! GET    /api/products/{id}    - Get product
//! PUT    /api/products/{id}    - Update price and/or images
//! DELETE /api/products/{id}    - Delete product permanently
//! ```

pub mod api;
pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the admin router (without static assets or middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(products::index))
        .merge(api::router())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AdminConfig, ConfigError};

    fn unconfigured_app() -> Router {
        let config = AdminConfig::with_woocommerce(Err(ConfigError::MissingEnvVar(
            "WC_CONSUMER_SECRET".to_string(),
        )));
        routes().with_state(AppState::new(config))
    }

    async fn get_path(path: &str) -> (StatusCode, String) {
        let response = unconfigured_app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(get_path("/health").await, (StatusCode::OK, "ok".to_string()));
    }

    #[tokio::test]
    async fn test_readiness_without_woocommerce() {
        let (status, _) = get_path("/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_index_page_renders_configuration_warning() {
        let (status, body) = get_path("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Mini Product Manager"));
        assert!(body.contains("Missing environment variable: WC_CONSUMER_SECRET"));
        assert!(body.contains("/static/js/products.js"));
    }
}
