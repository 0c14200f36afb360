//! Core types for Mini Product Manager.
//!
//! This module provides type-safe wrappers for the product domain and the
//! wire shapes exchanged between the UI, the proxy and WooCommerce.

pub mod envelope;
pub mod id;
pub mod price;
pub mod product;
pub mod request;
pub mod status;

pub use envelope::ApiResponse;
pub use id::*;
pub use price::{PriceError, RegularPrice};
pub use product::{Product, ProductImage};
pub use request::{
    CreateProductRequest, NewProduct, ProductPatch, UpdateProductRequest, ValidationError,
};
pub use status::ProductStatus;
