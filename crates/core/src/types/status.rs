//! Product lifecycle status.
//!
//! The lifecycle itself is owned by WooCommerce; this type only names the
//! values so they can be displayed and so created products can be published.

use serde::{Deserialize, Serialize};

/// WooCommerce product status.
///
/// Unknown values (plugins can register their own post statuses) are kept
/// verbatim in [`ProductStatus::Other`] so a product round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    Draft,
    Pending,
    Private,
    #[default]
    Publish,
    Future,
    Trash,
    Other(String),
}

impl ProductStatus {
    /// Get the WooCommerce API value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Publish => "publish",
            Self::Future => "future",
            Self::Trash => "trash",
            Self::Other(s) => s,
        }
    }

    /// Get a human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending review",
            Self::Private => "Private",
            Self::Publish => "Published",
            Self::Future => "Scheduled",
            Self::Trash => "Trash",
            Self::Other(s) => s,
        }
    }

    /// Whether the product is visible in the store.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Publish)
    }
}

impl From<String> for ProductStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "private" => Self::Private,
            "publish" => Self::Publish,
            "future" => Self::Future,
            "trash" => Self::Trash,
            _ => Self::Other(value),
        }
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        match status {
            ProductStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_round_trip() {
        for raw in ["draft", "pending", "private", "publish", "future", "trash"] {
            let status: ProductStatus = serde_json::from_str(&format!("\"{raw}\"")).unwrap();
            assert!(!matches!(status, ProductStatus::Other(_)), "{raw}");
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{raw}\""));
        }
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: ProductStatus = serde_json::from_str("\"wc-archived\"").unwrap();
        assert_eq!(status, ProductStatus::Other("wc-archived".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"wc-archived\"");
    }

    #[test]
    fn test_only_publish_is_published() {
        assert!(ProductStatus::Publish.is_published());
        assert!(!ProductStatus::Draft.is_published());
        assert!(!ProductStatus::Other("publish-ish".to_string()).is_published());
    }
}
