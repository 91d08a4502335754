//! Catalog browsing over an already fetched product list.

use std::collections::{BTreeMap, BTreeSet};

use crate::product::Product;

/// Franchise filter value meaning "no filter".
pub const ALL_FRANCHISES: &str = "all";

/// Filter and sort products for a listing page.
///
/// `franchise` matches `main_franchise` exactly; `None`, an empty string and
/// [`ALL_FRANCHISES`] disable the filter. `search` is a case-insensitive
/// substring match on the name or any tag. Results are sorted by name.
#[must_use]
pub fn browse(products: &[Product], franchise: Option<&str>, search: Option<&str>) -> Vec<Product> {
    let franchise = franchise.filter(|f| !f.is_empty() && *f != ALL_FRANCHISES);
    let term = search.map(str::trim).unwrap_or_default().to_lowercase();

    let mut matches: Vec<Product> = products
        .iter()
        .filter(|p| franchise.is_none_or(|f| p.main_franchise.as_deref() == Some(f)))
        .filter(|p| term.is_empty() || matches_term(p, &term))
        .cloned()
        .collect();

    matches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    matches
}

fn matches_term(product: &Product, term: &str) -> bool {
    product.name.to_lowercase().contains(term)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(term))
}

/// Franchises grouped by franchise category, both levels sorted.
///
/// Products missing either field are left out.
#[must_use]
pub fn franchise_groups(products: &[Product]) -> BTreeMap<String, BTreeSet<String>> {
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for product in products {
        if let (Some(category), Some(franchise)) =
            (&product.franchise_category, &product.main_franchise)
        {
            groups
                .entry(category.clone())
                .or_default()
                .insert(franchise.clone());
        }
    }
    groups
}
