//! Core types for Silkroots.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod email;
pub mod id;
pub mod pickup;
pub mod price;
pub mod status;
pub mod variant;

pub use customer::CustomerDetails;
pub use email::{Email, EmailError};
pub use id::*;
pub use pickup::{Coordinates, PickupLocation};
pub use price::{CurrencyCode, Price};
pub use status::{OrderStatus, PickupChannel};
pub use variant::{VariantSelection, or_na};
