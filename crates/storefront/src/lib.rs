//! Silkroots Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod middleware;
pub mod models;
pub mod pickup;
pub mod routes;
pub mod state;
