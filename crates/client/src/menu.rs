//! HTTP client for the storefront menu API.
//!
//! One `GET /api/menu/{tenant}` per call, no retries and no caching. An
//! unknown tenant comes back as [`MenuError::NotFound`] so callers can show a
//! not-found page instead of a generic failure.

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use comanda_core::MenuResponse;

/// Errors that can occur when fetching a menu.
#[derive(Debug, Error)]
pub enum MenuError {
    /// No tenant with this slug.
    #[error("tenant '{0}' not found")]
    NotFound(String),

    /// Server answered with a non-success status.
    #[error("menu request failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// Request could not be sent or the body could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL is not valid.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// Base URL cannot carry a path (e.g. `mailto:`).
    #[error("API URL cannot be used as a base: {0}")]
    NotABase(String),
}

/// Error body returned by the storefront.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Menu API client.
#[derive(Debug, Clone)]
pub struct MenuClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MenuClient {
    /// Create a client for the storefront at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse or cannot be used as a base.
    pub fn new(base_url: &str) -> Result<Self, MenuError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse or cannot be used as a base.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, MenuError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(MenuError::NotABase(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a tenant's menu. The slug is percent-encoded as one segment.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::NotABase` if the base URL cannot take path segments.
    pub fn menu_url(&self, tenant: &str) -> Result<Url, MenuError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MenuError::NotABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "menu", tenant]);
        Ok(url)
    }

    /// Fetch a tenant's menu.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::NotFound` on 404, `MenuError::Status` on any other
    /// non-success status and `MenuError::Http` on transport or decode errors.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_menu(&self, tenant: &str) -> Result<MenuResponse, MenuError> {
        let url = self.menu_url(tenant)?;

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(MenuError::NotFound(tenant.to_string()));
        }

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            tracing::error!(status = %status, %message, "Menu API returned non-success status");
            return Err(MenuError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let menu: MenuResponse = response.json().await?;
        tracing::debug!(categories = menu.categories.len(), "Fetched menu");
        Ok(menu)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_url_appends_segments() {
        let client = MenuClient::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            client.menu_url("estafeten").unwrap().as_str(),
            "http://127.0.0.1:3000/api/menu/estafeten"
        );

        let client = MenuClient::new("https://pedidos.example.com/base/").unwrap();
        assert_eq!(
            client.menu_url("estafeten").unwrap().as_str(),
            "https://pedidos.example.com/base/api/menu/estafeten"
        );
    }

    #[test]
    fn test_menu_url_encodes_slug() {
        let client = MenuClient::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            client.menu_url("a/b c").unwrap().as_str(),
            "http://127.0.0.1:3000/api/menu/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            MenuClient::new("not a url"),
            Err(MenuError::Url(_))
        ));
        assert!(matches!(
            MenuClient::new("mailto:someone@example.com"),
            Err(MenuError::NotABase(_))
        ));
    }
}
