//! Comanda Core - Shared types library.
//!
//! This crate provides common types used across all Comanda components:
//! - `storefront` - Menu API server and tenant seeding
//! - `client` - Menu client, cart store and product customization
//! - `cli` - Command-line tools for migrations, seeding and carts
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, slugs and prices, plus the menu
//!   wire format shared by server and client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
