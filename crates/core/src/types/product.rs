//! Product records as returned by the WooCommerce REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ImageId, ProductId, ProductStatus, RegularPrice};

/// A WooCommerce product.
///
/// Only the fields this application reads or writes are typed. Everything
/// else the store returns is kept in `extra` so the record can be echoed back
/// to callers unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Decimal-as-string; empty for products without a base price (e.g. variable products).
    #[serde(default)]
    pub regular_price: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// The first image, used as the listing thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// The regular price, if the store returned a valid positive amount.
    #[must_use]
    pub fn price(&self) -> Option<RegularPrice> {
        RegularPrice::parse(&self.regular_price).ok()
    }
}

/// An image reference attached to a product.
///
/// On requests only `src` is required; WooCommerce sideloads the URL into
/// its media library and returns the stored image with an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ImageId>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductImage {
    /// Create an image reference from a source URL.
    #[must_use]
    pub fn from_src(src: impl Into<String>) -> Self {
        Self {
            id: None,
            src: src.into(),
            name: None,
            alt: None,
            extra: Map::new(),
        }
    }

    /// Alt text, falling back to the given product name when empty.
    #[must_use]
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.alt
            .as_deref()
            .filter(|alt| !alt.is_empty())
            .unwrap_or(fallback)
    }
}
