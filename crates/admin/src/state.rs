//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{AdminConfig, ConfigError};
use crate::error::AppError;
use crate::woocommerce::WooCommerceClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration and the WooCommerce
/// client built from it once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    woocommerce: Result<WooCommerceClient, ConfigError>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// A missing or invalid WooCommerce configuration does not prevent the
    /// state from being built; product routes report it per request instead.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let woocommerce = config.woocommerce.clone().and_then(|wc| {
            WooCommerceClient::new(&wc).map_err(|e| {
                ConfigError::InvalidEnvVar("WC_URL".to_string(), e.to_string())
            })
        });

        match &woocommerce {
            Ok(client) => tracing::info!(api_base = %client.api_base(), "WooCommerce client ready"),
            Err(e) => tracing::warn!(error = %e, "WooCommerce is not configured"),
        }

        Self {
            inner: Arc::new(AppStateInner {
                config,
                woocommerce,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the WooCommerce client.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the store credentials are missing.
    pub fn woocommerce(&self) -> Result<&WooCommerceClient, AppError> {
        self.inner
            .woocommerce
            .as_ref()
            .map_err(|e| AppError::Config(e.clone()))
    }

    /// Whether product routes can reach the store.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.woocommerce.is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::config::WooCommerceConfig;

    #[test]
    fn test_state_without_woocommerce_reports_config_error() {
        let state = AppState::new(AdminConfig::with_woocommerce(Err(
            ConfigError::MissingEnvVar("WC_CONSUMER_KEY".to_string()),
        )));

        assert!(!state.is_ready());
        let err = state.woocommerce().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: WC_CONSUMER_KEY"
        );
    }

    #[test]
    fn test_state_with_woocommerce_is_ready() {
        let state = AppState::new(AdminConfig::with_woocommerce(Ok(WooCommerceConfig {
            url: Url::parse("https://shop.test").unwrap(),
            api_version: "wc/v3".to_string(),
            consumer_key: "ck_test".to_string(),
            consumer_secret: SecretString::from("cs_test"),
        })));

        assert!(state.is_ready());
        assert_eq!(
            state.woocommerce().unwrap().api_base().as_str(),
            "https://shop.test/wp-json/wc/v3/"
        );
    }
}
