//! Create and update payloads, and the validation that turns them into the
//! exact bodies sent to WooCommerce.

use serde::{Deserialize, Serialize};

use super::{PriceError, ProductImage, ProductStatus, RegularPrice};

/// Product type assigned to every product created through this application.
pub const CREATED_PRODUCT_TYPE: &str = "simple";

/// Validation failures for incoming product payloads.
///
/// The messages are part of the HTTP contract and are shown verbatim in the UI.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name and regular_price are required")]
    MissingCreateFields,
    #[error("regular_price or images is required")]
    MissingUpdateFields,
    #[error("regular_price must be a positive decimal amount")]
    InvalidPrice(PriceError),
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,
}

/// Body of `PUT /api/products/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,
}

/// A validated product ready to be created upstream.
///
/// `type` and `status` are fixed: callers cannot create drafts or variable
/// products through this application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: &'static str,
    pub regular_price: RegularPrice,
    pub status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,
}

/// A validated partial update. Absent fields are left untouched upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<RegularPrice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,
}

/// Treat missing, empty and whitespace-only strings alike.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl CreateProductRequest {
    /// Validate the request into the body sent to WooCommerce.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCreateFields`] when the name or price
    /// is missing, blank or zero, and [`ValidationError::InvalidPrice`] when
    /// the price is not a positive decimal.
    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        let (Some(name), Some(price)) = (
            non_blank(self.name.as_deref()),
            non_blank(self.regular_price.as_deref()),
        ) else {
            return Err(ValidationError::MissingCreateFields);
        };

        let regular_price = RegularPrice::parse(price).map_err(|e| match e {
            PriceError::Empty | PriceError::Zero => ValidationError::MissingCreateFields,
            other => ValidationError::InvalidPrice(other),
        })?;

        Ok(NewProduct {
            name: name.to_owned(),
            product_type: CREATED_PRODUCT_TYPE,
            regular_price,
            status: ProductStatus::Publish,
            images: self.images.filter(|images| !images.is_empty()),
        })
    }
}

impl UpdateProductRequest {
    /// Request that only changes the price.
    #[must_use]
    pub fn price(regular_price: impl Into<String>) -> Self {
        Self {
            regular_price: Some(regular_price.into()),
            images: None,
        }
    }

    /// Request that only replaces the image list.
    #[must_use]
    pub const fn images(images: Vec<ProductImage>) -> Self {
        Self {
            regular_price: None,
            images: Some(images),
        }
    }

    /// Validate the request into a partial update.
    ///
    /// An empty `images` array counts as present: it clears the product's images.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingUpdateFields`] when neither field is
    /// supplied and [`ValidationError::InvalidPrice`] when a supplied price is
    /// not a positive decimal.
    pub fn validate(self) -> Result<ProductPatch, ValidationError> {
        let price = non_blank(self.regular_price.as_deref());

        if price.is_none() && self.images.is_none() {
            return Err(ValidationError::MissingUpdateFields);
        }

        let regular_price = price
            .map(RegularPrice::parse)
            .transpose()
            .map_err(ValidationError::InvalidPrice)?;

        Ok(ProductPatch {
            regular_price,
            images: self.images,
        })
    }
}
