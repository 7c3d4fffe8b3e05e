//! Drive the persisted ordering cart from the terminal.
//!
//! Lines are addressed by their 1-based position as printed by `cart show`.
//!
//! # Environment Variables
//!
//! - `COMANDA_CART_DIR` - Directory holding the cart snapshot (default `.comanda`)
//! - `COMANDA_API_URL` - Storefront base URL used by `cart add`

use std::fmt;
use std::path::Path;

use thiserror::Error;

use comanda_client::cart::{Cart, CartStorage, CartStore, FileStorage, LineKey};
use comanda_client::customize::{CustomizeError, ModifierCatalog, ProductCustomization};
use comanda_client::menu::MenuClient;
use comanda_core::MenuProduct;
use comanda_storefront::seed;

/// Errors specific to cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("no cart line #{index} (cart has {len} lines)")]
    NoSuchLine { index: usize, len: usize },

    #[error("product '{product}' is not on the menu of '{tenant}'")]
    UnknownProduct { tenant: String, product: String },
}

/// What to add and how to customize it.
#[derive(Debug)]
pub struct AddRequest<'a> {
    pub api_url: &'a str,
    pub tenant: &'a str,
    pub product: &'a str,
    pub bread: Option<&'a str>,
    pub side: Option<&'a str>,
    /// Seed document whose modifier groups replace the built-in catalog.
    pub modifiers: Option<&'a Path>,
}

fn open(cart_dir: &Path) -> CartStore<FileStorage> {
    CartStore::open(FileStorage::new(cart_dir))
}

/// Print the cart.
pub fn show(cart_dir: &Path) {
    let store = open(cart_dir);

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(store.cart()));
    }
}

/// Add a customized product from the tenant's menu.
///
/// A bread and a side are both required; the line is priced at the base
/// price plus the side's delta.
///
/// # Errors
///
/// Returns an error if the menu cannot be fetched, the product or a modifier
/// is unknown, a selection is missing, or the cart cannot be saved.
pub async fn add(
    cart_dir: &Path,
    request: &AddRequest<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let menu = MenuClient::new(request.api_url)?
        .fetch_menu(request.tenant)
        .await?;

    let product = menu
        .product_named(request.product)
        .ok_or_else(|| CartCommandError::UnknownProduct {
            tenant: request.tenant.to_string(),
            product: request.product.to_string(),
        })?;

    let catalog = load_catalog(request.modifiers).await?;
    let mut store = open(cart_dir);
    add_customized(&mut store, product, &catalog, request.bread, request.side)?;

    tracing::info!(product = %product.name, "Added to cart");

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(store.cart()));
    }

    Ok(())
}

/// Run the customization flow for `product` and confirm it into `store`.
fn add_customized<S: CartStorage>(
    store: &mut CartStore<S>,
    product: &MenuProduct,
    catalog: &ModifierCatalog,
    bread: Option<&str>,
    side: Option<&str>,
) -> Result<LineKey, CustomizeError> {
    let mut flow = ProductCustomization::open(product, catalog);
    if let Some(bread) = bread {
        flow.select_bread(bread)?;
    }
    if let Some(side) = side {
        flow.select_side(side)?;
    }
    flow.confirm(store)
}

/// Which single-line operation to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    Increment,
    Decrement,
    Remove,
}

/// Apply `op` to the line at 1-based `index`.
///
/// # Errors
///
/// Returns an error if there is no such line or the cart cannot be saved.
pub fn update_line(
    cart_dir: &Path,
    index: usize,
    op: LineOp,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(cart_dir);
    let key = line_key(store.cart(), index)?;

    match op {
        LineOp::Increment => store.increment(&key)?,
        LineOp::Decrement => store.decrement(&key)?,
        LineOp::Remove => store.remove(&key)?,
    }

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(store.cart()));
    }

    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear(cart_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(cart_dir);
    store.clear()?;

    #[allow(clippy::print_stdout)]
    {
        println!("Cart cleared");
    }

    Ok(())
}

async fn load_catalog(
    modifiers: Option<&Path>,
) -> Result<ModifierCatalog, Box<dyn std::error::Error>> {
    match modifiers {
        Some(path) => {
            let doc = seed::load_document(path).await?;
            Ok(ModifierCatalog::from_groups(&doc.modifier_groups)?)
        }
        None => Ok(ModifierCatalog::default()),
    }
}

fn line_key(cart: &Cart, index: usize) -> Result<LineKey, CartCommandError> {
    index
        .checked_sub(1)
        .and_then(|i| cart.lines().get(i))
        .map(comanda_client::CartLine::key)
        .ok_or(CartCommandError::NoSuchLine {
            index,
            len: cart.len(),
        })
}

/// Plain-text rendering of the cart with numbered lines and subtotal.
pub fn render(cart: &Cart) -> String {
    CartView(cart).to_string()
}

struct CartView<'a>(&'a Cart);

impl fmt::Display for CartView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cart = self.0;
        if cart.is_empty() {
            return writeln!(f, "Cart is empty");
        }

        for (i, line) in cart.lines().iter().enumerate() {
            let total = line.line_total().to_string();
            writeln!(
                f,
                "{:>2}. {} x {:<36} {total:>12}",
                i + 1,
                line.quantity,
                line.name
            )?;

            let details: Vec<String> = [
                line.modifiers.bread.as_ref().map(|b| format!("PAN: {b}")),
                line.modifiers.side.as_ref().map(|s| format!("GUARNICIÓN: {s}")),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !details.is_empty() {
                writeln!(f, "      {}", details.join(" · "))?;
            }
        }

        let subtotal = cart.subtotal().to_string();
        writeln!(f, "\n{:<45} {subtotal:>12}", "Subtotal")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::routing::get;
    use axum::{Json, Router};
    use comanda_client::CartModifiers;
    use comanda_client::cart::MemoryStorage;
    use comanda_core::{Price, ProductId};
    use serde_json::json;

    use super::*;

    /// Serve a one-product menu for any tenant and return the base URL.
    async fn spawn_menu_server() -> String {
        let menu = json!({
            "tenant": {
                "id": "0b9a7c7e-8d0c-4a53-9a52-0f2b8c1e2d10",
                "slug": "estafeten",
                "name": "Estafeten",
                "branding": null,
                "settings": null
            },
            "categories": [{
                "id": "5d1f4a8e-2c7b-4f0e-b1a9-6e3c2d4f5a60",
                "name": "Bocadillos",
                "slug": "bocadillos",
                "sortOrder": 1,
                "isFeatured": true,
                "products": [{
                    "id": "9e8d7c6b-5a49-4382-9170-6f5e4d3c2b1a",
                    "name": "Lomo con queso",
                    "description": "",
                    "basePriceCents": 650
                }]
            }]
        });
        let app = Router::new().route(
            "/api/menu/{tenant}",
            get(move || {
                let menu = menu.clone();
                async move { Json(menu) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn add_request<'a>(
        api_url: &'a str,
        bread: Option<&'a str>,
        side: Option<&'a str>,
    ) -> AddRequest<'a> {
        AddRequest {
            api_url,
            tenant: "estafeten",
            product: "Lomo con queso",
            bread,
            side,
            modifiers: None,
        }
    }

    fn missing_selection(err: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
        match err.downcast_ref::<CustomizeError>() {
            Some(CustomizeError::MissingSelection(group)) => Some(*group),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_add_requires_bread_and_side() {
        let api_url = spawn_menu_server().await;
        let tmp = tempfile::tempdir().unwrap();

        let err = add(tmp.path(), &add_request(&api_url, None, None))
            .await
            .unwrap_err();
        assert_eq!(missing_selection(err.as_ref()), Some("bread"));
        assert!(open(tmp.path()).cart().is_empty());

        let err = add(tmp.path(), &add_request(&api_url, Some("Tradicional"), None))
            .await
            .unwrap_err();
        assert_eq!(missing_selection(err.as_ref()), Some("side"));
        assert!(open(tmp.path()).cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_with_selections_prices_side() {
        let api_url = spawn_menu_server().await;
        let tmp = tempfile::tempdir().unwrap();

        add(
            tmp.path(),
            &add_request(&api_url, Some("Tradicional"), Some("Boniato")),
        )
        .await
        .unwrap();

        let store = open(tmp.path());
        let line = store.lines().first().unwrap();
        assert_eq!(line.unit_price_cents, Price::from_cents(770));
        assert_eq!(line.modifiers.bread.as_deref(), Some("Tradicional"));
        assert_eq!(line.modifiers.side.as_deref(), Some("Boniato"));
    }

    #[test]
    fn test_add_customized_leaves_cart_untouched_on_error() {
        let catalog = ModifierCatalog::default();
        let mut store = CartStore::open(MemoryStorage::new());
        let product = MenuProduct {
            id: ProductId::generate(),
            name: "Vegetal".to_string(),
            description: String::new(),
            base_price_cents: Price::from_cents(550),
        };

        let err =
            add_customized(&mut store, &product, &catalog, None, Some("Boniato")).unwrap_err();
        assert!(matches!(err, CustomizeError::MissingSelection("bread")));

        let err = add_customized(
            &mut store,
            &product,
            &catalog,
            Some("Integral"),
            Some("Boniato"),
        )
        .unwrap_err();
        assert!(matches!(err, CustomizeError::UnknownBread(_)));
        assert!(store.cart().is_empty());

        add_customized(
            &mut store,
            &product,
            &catalog,
            Some("Mantequilla"),
            Some("Patatas fritas (incluido)"),
        )
        .unwrap();
        assert_eq!(store.subtotal(), Price::from_cents(550));
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        let p1 = ProductId::generate();
        cart.add_item(
            p1,
            "P1",
            Price::from_cents(620),
            Some(CartModifiers::new(
                Some("Tradicional"),
                Some("Boniato"),
                Price::from_cents(120),
            )),
        );
        cart.add_item(p1, "P1", Price::from_cents(500), None);
        cart
    }

    #[tokio::test]
    async fn test_demo_modifiers_match_builtin_catalog() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/seed/estafeten.json");
        let catalog = load_catalog(Some(&path)).await.unwrap();
        assert_eq!(catalog, ModifierCatalog::default());
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_shows_modifiers_and_subtotal() {
        let text = render(&sample_cart());

        assert!(text.contains(" 1. 1 x P1"));
        assert!(text.contains("PAN: Tradicional · GUARNICIÓN: Boniato"));
        assert!(text.contains(" 2. 1 x P1"));
        assert!(text.contains("11,20\u{a0}€"));
    }

    #[test]
    fn test_line_key_is_one_based() {
        let cart = sample_cart();

        let first = line_key(&cart, 1).unwrap();
        assert_eq!(first.side.as_deref(), Some("Boniato"));

        assert!(matches!(
            line_key(&cart, 0),
            Err(CartCommandError::NoSuchLine { index: 0, len: 2 })
        ));
        assert!(matches!(
            line_key(&cart, 3),
            Err(CartCommandError::NoSuchLine { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_update_line_persists() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut store = open(tmp.path());
            store
                .add_item(ProductId::generate(), "P1", Price::from_cents(500), None)
                .unwrap();
        }

        update_line(tmp.path(), 1, LineOp::Increment).unwrap();
        assert_eq!(open(tmp.path()).item_count(), 2);

        update_line(tmp.path(), 1, LineOp::Remove).unwrap();
        assert!(open(tmp.path()).cart().is_empty());

        assert!(update_line(tmp.path(), 1, LineOp::Decrement).is_err());
    }
}
