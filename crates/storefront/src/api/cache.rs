//! Cache types for catalog responses.

use frikibox_core::Product;

/// Key of the full product list.
pub const ALL_PRODUCTS: &str = "products:all";

/// Key of a single product.
pub fn product_key(id: &str) -> String {
    format!("product:{id}")
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}
