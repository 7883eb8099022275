//! Silkroots Core - Shared types library.
//!
//! This crate provides common types used across all Silkroots components:
//! - `storefront` - Public-facing e-commerce site (cart, pickup, checkout)
//! - `payments` - Server-side crypto charge-creation function
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, variants, statuses
//! - [`order`] - Canonical order model and the card/crypto record union

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod order;
pub mod types;

pub use order::{Order, OrderCustomer, OrderItem, OrderRecord, OrderSummary, SummaryItem};
pub use types::*;
