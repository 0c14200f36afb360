//! Mini Product Manager Core - Shared types library.
//!
//! This crate provides the types shared by every Mini Product Manager component:
//! - `admin` - REST proxy and admin page in front of the WooCommerce API
//! - `cli` - Command-line front end for the same routes
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. Both the server and the CLI validate input with the same rules.
//!
//! # Modules
//!
//! - [`types`] - Product records, prices, statuses, request payloads and the
//!   JSON response envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
