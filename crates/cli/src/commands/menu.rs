//! Fetch and print a tenant's menu.

use std::fmt;

use comanda_client::menu::MenuClient;
use comanda_core::MenuResponse;

/// Print the menu of `tenant` as served by the storefront at `api_url`.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the tenant does not exist or the
/// request fails.
pub async fn show(api_url: &str, tenant: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = MenuClient::new(api_url)?;
    let menu = client.fetch_menu(tenant).await?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&menu));
    }

    Ok(())
}

/// Plain-text rendering of a menu.
pub fn render(menu: &MenuResponse) -> String {
    MenuView(menu).to_string()
}

struct MenuView<'a>(&'a MenuResponse);

impl fmt::Display for MenuView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let menu = self.0;
        writeln!(f, "{} ({})", menu.tenant.name, menu.tenant.slug)?;

        for category in &menu.categories {
            let featured = if category.is_featured { " *" } else { "" };
            writeln!(f, "\n{}{featured}", category.name)?;

            if category.products.is_empty() {
                writeln!(f, "  (no products)")?;
            }

            for product in &category.products {
                let price = product.base_price_cents.to_string();
                writeln!(f, "  {:<40} {price:>12}", product.name)?;
                if !product.description.is_empty() {
                    writeln!(f, "    {}", product.description)?;
                }
            }
        }

        Ok(())
    }
}
