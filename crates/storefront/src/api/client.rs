//! FrikiBox service client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP. Catalog reads are cached using `moka` for
//! the configured TTL; writes to the catalog invalidate the cache.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, Response, multipart::Form};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use frikibox_core::{
    CartItem, CartLedger, CheckoutConfirmation, Order, Product, ProductId, ShippingAddress, User,
    UserId,
};

use super::ApiError;
use super::cache::{ALL_PRODUCTS, CacheValue, product_key};
use super::types::{
    AuthResponse, ErrorBody, LoginRequest, OrdersResponse, OutgoingCartItem, PaymentRequest,
    PaymentResponse, RegisterRequest, SaveCartRequest, WireCart, WireProduct,
};
use crate::config::ApiConfig;

/// Longest slice of an error body kept for logs and error messages.
const ERROR_BODY_PREVIEW: usize = 200;

// =============================================================================
// FrikiBoxClient
// =============================================================================

/// Client for the remote FrikiBox service.
///
/// Cheap to clone; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct FrikiBoxClient {
    inner: Arc<FrikiBoxClientInner>,
}

struct FrikiBoxClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    cache: Cache<String, CacheValue>,
}

impl FrikiBoxClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot take path segments or the
    /// HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut base_url = config.base_url.clone();
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        // Keep a trailing slash off so segment pushes land after the last one.
        base_url
            .path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(config.base_url.to_string()))?
            .pop_if_empty();

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(FrikiBoxClientInner {
                client,
                base_url,
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and return the body of a success response.
    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        Self::read_body(response).await
    }

    async fn read_body(response: Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
        tracing::warn!(
            status = %status,
            body = %preview,
            "FrikiBox service returned non-success status"
        );

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(preview);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(ERROR_BODY_PREVIEW * 2).collect::<String>(),
                "Failed to parse FrikiBox service response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let body = self.send(self.request(Method::GET, url)).await?;
        Self::decode(&body)
    }

    async fn post_json<B, T>(&self, url: Url, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send(self.request(Method::POST, url).json(payload))
            .await?;
        Self::decode(&body)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(ALL_PRODUCTS).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let wire: Vec<WireProduct> = self.get_json(self.endpoint(&["products", "all"])?).await?;
        let products: Vec<Product> = wire.into_iter().map(Product::from).collect();
        debug!(count = products.len(), "Fetched product list");

        self.inner
            .cache
            .insert(
                ALL_PRODUCTS.to_string(),
                CacheValue::Products(products.clone()),
            )
            .await;

        Ok(products)
    }

    /// Get one product, including its variants.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, or another error if
    /// the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = product_key(id.as_str());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", id.as_str()])?;
        let wire: WireProduct = match self.get_json(url).await {
            Ok(wire) => wire,
            Err(ApiError::Status { status: 404, .. }) => {
                return Err(ApiError::NotFound(format!("Product not found: {id}")));
            }
            Err(e) => return Err(e),
        };
        let product = Product::from(wire);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Drop every cached catalog entry.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Create a product from a multipart form built by the admin handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, form))]
    pub async fn create_product(&self, form: Form) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products"])?;
        let body = self
            .send(self.request(Method::POST, url).multipart(form))
            .await?;
        let wire: WireProduct = Self::decode(&body)?;

        self.invalidate_catalog();
        Ok(wire.into())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        match self.send(self.request(Method::DELETE, url)).await {
            Ok(_) => {}
            Err(ApiError::Status { status: 404, .. }) => {
                return Err(ApiError::NotFound(format!("Product not found: {id}")));
            }
            Err(e) => return Err(e),
        }

        self.invalidate_catalog();
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Check credentials with the auth service.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` when the service rejects the credentials,
    /// or another error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let response: AuthResponse = self
            .post_json(
                self.endpoint(&["auth", "login"])?,
                &LoginRequest { email, password },
            )
            .await?;
        Self::user_from(response)
    }

    /// Create an account with the auth service.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` when the service rejects the registration,
    /// or another error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let response: AuthResponse = self
            .post_json(
                self.endpoint(&["auth", "register"])?,
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
            )
            .await?;
        Self::user_from(response)
    }

    fn user_from(response: AuthResponse) -> Result<User, ApiError> {
        User::try_from(response.into_user()).map_err(|e| ApiError::InvalidField {
            field: "email",
            reason: e.to_string(),
        })
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Load a user's stored cart, normalised.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn load_cart(&self, user_id: &UserId) -> Result<CartLedger, ApiError> {
        let wire: WireCart = self
            .get_json(self.endpoint(&["cart", user_id.as_str()])?)
            .await?;
        Ok(CartLedger::from_items(
            wire.items.into_iter().map(CartItem::from),
        ))
    }

    /// Replace a user's stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, cart), fields(user_id = %user_id, lines = cart.items().len()))]
    pub async fn save_cart(&self, user_id: &UserId, cart: &CartLedger) -> Result<(), ApiError> {
        let url = self.endpoint(&["cart", user_id.as_str()])?;
        let payload = SaveCartRequest {
            items: OutgoingCartItem::from_cart(cart),
        };
        self.send(self.request(Method::POST, url).json(&payload))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Checkout & orders
    // =========================================================================

    /// Start a payment session and return the processor's redirect URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingField` when the response carries no URL, or
    /// another error if the request fails.
    #[instrument(skip(self, cart, address), fields(lines = cart.items().len()))]
    pub async fn create_payment(
        &self,
        cart: &CartLedger,
        address: &ShippingAddress,
    ) -> Result<String, ApiError> {
        let payload = PaymentRequest {
            cart: OutgoingCartItem::from_cart(cart),
            address,
        };
        let response: PaymentResponse = self
            .post_json(self.endpoint(&["payments", "payment"])?, &payload)
            .await?;

        response
            .url
            .filter(|url| !url.is_empty())
            .ok_or(ApiError::MissingField("url"))
    }

    /// Fetch the summary of a completed checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutConfirmation, ApiError> {
        let mut url = self.endpoint(&["checkout-session"])?;
        url.query_pairs_mut().append_pair("sessionId", session_id);
        self.get_json(url).await
    }

    /// Fetch a user's orders. Totals are recomputed by `Order::total`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn my_orders(&self, user_id: &UserId) -> Result<Vec<Order>, ApiError> {
        let mut url = self.endpoint(&["orders", "my-orders"])?;
        url.query_pairs_mut().append_pair("userId", user_id.as_str());
        let response: OrdersResponse = self.get_json(url).await?;
        Ok(response.into_orders())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> FrikiBoxClient {
        FrikiBoxClient::new(&ApiConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:3001");
        assert_eq!(
            c.endpoint(&["products", "all"]).unwrap().as_str(),
            "http://localhost:3001/products/all"
        );

        let c = client("https://api.frikibox.com/v1/");
        assert_eq!(
            c.endpoint(&["cart", "u 1"]).unwrap().as_str(),
            "https://api.frikibox.com/v1/cart/u%201"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = ApiConfig::new(Url::parse("mailto:shop@frikibox.com").unwrap());
        assert!(matches!(
            FrikiBoxClient::new(&config),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }
}
