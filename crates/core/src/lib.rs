//! Clementine Core - Shared types library.
//!
//! This crate provides the common types used by the Clementine storefront
//! client: the product identifier, the persisted cart multiset, and money
//! formatting.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - `ProductId`, `Cart`, and money display helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
