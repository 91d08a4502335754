//! Catalog route handlers.

use std::collections::{BTreeMap, BTreeSet};

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use frikibox_core::{Product, ProductId, catalog};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for product browsing.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    /// Franchise to filter by; `all` or absent means no filter.
    pub franchise: Option<String>,
    /// Case-insensitive search over names and tags.
    pub q: Option<String>,
}

/// List products matching the franchise filter and search text.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.api().products().await?;
    let matching = catalog::browse(&products, query.franchise.as_deref(), query.q.as_deref());

    tracing::debug!(total = products.len(), matching = matching.len(), "Browsed catalog");
    Ok(Json(matching))
}

/// Franchises grouped by franchise category, for the filter menu.
#[instrument(skip(state))]
pub async fn franchises(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, BTreeSet<String>>>> {
    let products = state.api().products().await?;
    Ok(Json(catalog::franchise_groups(&products)))
}

/// Product detail, including variants.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let product = state.api().product(&ProductId::from(id)).await?;
    Ok(Json(product))
}

/// Resolve the size to record for `product`.
///
/// Clothing needs a size from its size list; everything else is sized `""`
/// whatever the client sent.
pub(crate) fn required_size(product: &Product, size: Option<&str>) -> Result<String> {
    if !product.is_clothing() {
        return Ok(String::new());
    }

    let size = size
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Select a size for {}", product.name)))?;

    if !product.offers_size(size) {
        return Err(AppError::BadRequest(format!(
            "Size {size} is not available for {}",
            product.name
        )));
    }

    Ok(size.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frikibox_core::CLOTHING;

    use super::*;

    fn shirt() -> Product {
        Product {
            category: Some(CLOTHING.to_string()),
            available_sizes: vec!["M".to_string(), "L".to_string()],
            ..Product::new("B", "Shirt B", None)
        }
    }

    #[test]
    fn test_non_clothing_ignores_size() {
        let figure = Product::new("A", "Figure A", None);
        assert_eq!(required_size(&figure, Some("XL")).unwrap(), "");
        assert_eq!(required_size(&figure, None).unwrap(), "");
    }

    #[test]
    fn test_clothing_requires_size() {
        assert!(matches!(
            required_size(&shirt(), None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            required_size(&shirt(), Some("  ")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_clothing_size_must_be_offered() {
        assert_eq!(required_size(&shirt(), Some(" M ")).unwrap(), "M");
        assert!(matches!(
            required_size(&shirt(), Some("XS")),
            Err(AppError::BadRequest(_))
        ));
    }
}
