//! Comanda storefront library.
//!
//! Serves the per-tenant menu API and owns the tenant seed procedure. Exposed
//! as a library so the CLI and integration tests can reuse the router, the
//! database layer and the seeder.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod state;
