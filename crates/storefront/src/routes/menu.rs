//! Menu API handler.
//!
//! Serves a tenant's public menu as JSON for the ordering page. This is a
//! single read per request with no retries: an unknown tenant is a 404 and
//! anything else that goes wrong is a 500.

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use comanda_core::{MenuResponse, Slug};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/menu/{tenant}`
///
/// # Errors
///
/// Returns `AppError::NotFound` when no tenant has this slug (including slugs
/// that are not well-formed), and `AppError::Database` if a query fails.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<MenuResponse>> {
    // A malformed slug can never match a stored tenant
    let Ok(slug) = Slug::parse(&tenant) else {
        return Err(tenant_not_found());
    };

    let repo = state.menu();
    let Some(tenant) = repo.find_tenant(slug.as_str()).await? else {
        return Err(tenant_not_found());
    };

    let menu = repo.menu_for(tenant).await?;
    tracing::debug!(categories = menu.categories.len(), "Serving menu");

    Ok(Json(menu))
}

fn tenant_not_found() -> AppError {
    AppError::NotFound("Tenant".to_string())
}
