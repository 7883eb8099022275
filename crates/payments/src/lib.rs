//! Silkroots Payments library.
//!
//! Server-side charge-creation function: translates an internal charge
//! request into a crypto-payment-gateway call. This is the only Silkroots
//! component that holds a gateway secret.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod charge;
pub mod commerce;
pub mod config;
pub mod error;
