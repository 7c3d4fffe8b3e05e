//! Comanda ordering client.
//!
//! Everything the ordering page needs besides rendering:
//!
//! - [`menu`]: fetch a tenant's menu from the storefront API
//! - [`cart`]: the cart model and its persisted, observable store
//! - [`customize`]: bread and side selection before adding a product
//!
//! # Example
//!
//! ```rust,ignore
//! use comanda_client::cart::{CartStore, FileStorage};
//! use comanda_client::customize::{ModifierCatalog, ProductCustomization};
//! use comanda_client::menu::MenuClient;
//!
//! let menu = MenuClient::new("http://127.0.0.1:3000")?.fetch_menu("estafeten").await?;
//! let mut store = CartStore::open(FileStorage::new(".comanda"));
//!
//! let catalog = ModifierCatalog::default();
//! let product = menu.product_named("Lomo con queso").unwrap();
//! let mut flow = ProductCustomization::open(product, &catalog);
//! flow.select_bread("Tradicional")?;
//! flow.select_side("Boniato")?;
//! flow.confirm(&mut store)?;
//!
//! println!("{}", store.subtotal());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod customize;
pub mod menu;

pub use cart::{Cart, CartLine, CartModifiers, CartStore, LineKey};
pub use customize::{CustomizeError, DismissReason, ModifierCatalog, ProductCustomization};
pub use menu::{MenuClient, MenuError};
