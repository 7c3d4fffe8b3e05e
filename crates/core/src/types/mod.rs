//! Core types for Comanda.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod menu;
pub mod modifier;
pub mod price;
pub mod slug;

pub use id::*;
pub use menu::{MenuCategory, MenuProduct, MenuResponse, TenantSummary};
pub use modifier::{ModifierGroup, ModifierOption};
pub use price::Price;
pub use slug::{Slug, SlugError};
