//! HTTP client for the e-commerce backend
//!
//! Thin wrappers: attach the bearer token from the session, send, map the
//! status and envelope into [`Error`]. No retries and no timeouts beyond
//! reqwest's defaults; each call is independent.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest, Role};
use crate::client::envelope::{error_message, ApiResponse};
use crate::client::resources::Resource;
use crate::error::{Error, Result};
use crate::session::SessionContext;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    base_url: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionContext>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid API base URL '{}': cannot carry a path",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("storedesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Base URL with `segments` appended, each percent-encoded on its own
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("Invalid API base URL '{}'", self.base_url)))?;
            path.pop_if_empty();
            for segment in segments {
                if matches!(*segment, "" | "." | "..") {
                    return Err(Error::InvalidId(segment.to_string()));
                }
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Fixed path such as `/vendor/orders` or `/auth/all-users?role=vendor`
    fn path_url(&self, path: &str) -> Result<Url> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut url = self.url(&segments)?;
        url.set_query(query);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send and return the body of a 2xx response. A 401 on an
    /// authenticated request means the stored token is dead: the session
    /// is cleared the way a logout would.
    async fn execute(
        &self,
        req: RequestBuilder,
        fallback: &str,
        authenticated: bool,
    ) -> Result<Vec<u8>> {
        let response = req.send().await.map_err(|e| {
            tracing::warn!("Network error: {}", e);
            Error::Network(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| fallback.to_string());
            tracing::warn!("Request failed ({}): {}", status.as_u16(), message);

            if authenticated && status == StatusCode::UNAUTHORIZED {
                tracing::info!("Session rejected by the backend, logging out");
                if let Err(e) = self.session.logout() {
                    tracing::warn!("Failed to clear rejected session: {}", e);
                }
            }

            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn envelope<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<ApiResponse<T>> {
        let body = self.execute(req, "Request failed", true).await?;
        let response: ApiResponse<T> = serde_json::from_slice(&body)?;
        response.into_result()
    }

    async fn fetch_data<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url.path());
        self.envelope(self.request(Method::GET, url))
            .await?
            .into_data()
    }

    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<ApiResponse<Value>> {
        tracing::debug!("{} {}", method, url.path());
        let mut req = self.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.envelope(req).await
    }

    /// `GET` an enveloped payload from a fixed path
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch_data(self.path_url(path)?).await
    }

    /// Send a mutation to a fixed path and return the (success-checked) envelope
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<Value>> {
        self.mutate(method, self.path_url(path)?, body).await
    }

    // Auth

    /// `POST /auth/login`. The response is not enveloped.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        tracing::info!("Login attempt: {}", credentials.email);
        let req = self.http.post(self.path_url("/auth/login")?).json(credentials);
        let body = self.execute(req, "Login failed", false).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// `POST /auth/register`
    pub async fn register(&self, account: &RegisterRequest) -> Result<Value> {
        tracing::info!("Register attempt: {}", account.email);
        let req = self.http.post(self.path_url("/auth/register")?).json(account);
        let body = self.execute(req, "Registration failed", false).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn user(&self, id: &str) -> Result<Value> {
        self.fetch_data(self.url(&["auth", "user", id])?).await
    }

    pub async fn users_by_role(&self, role: Role) -> Result<Vec<Value>> {
        let mut url = self.url(&["auth", "all-users"])?;
        url.query_pairs_mut().append_pair("role", role.as_str());
        self.fetch_data(url).await
    }

    // Generic CRUD

    fn item_url(&self, resource: Resource, id: &str) -> Result<Url> {
        let mut segments = resource.segments();
        segments.push(id);
        self.url(&segments)
    }

    pub async fn list(&self, resource: Resource) -> Result<Vec<Value>> {
        self.get(resource.path()).await
    }

    pub async fn fetch(&self, resource: Resource, id: &str) -> Result<Value> {
        self.fetch_data(self.item_url(resource, id)?).await
    }

    pub async fn create(&self, resource: Resource, record: &Value) -> Result<ApiResponse<Value>> {
        self.send(Method::POST, resource.path(), Some(record)).await
    }

    pub async fn update(
        &self,
        resource: Resource,
        id: &str,
        record: &Value,
    ) -> Result<ApiResponse<Value>> {
        self.mutate(Method::PUT, self.item_url(resource, id)?, Some(record))
            .await
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<ApiResponse<Value>> {
        self.mutate::<Value>(Method::DELETE, self.item_url(resource, id)?, None)
            .await
    }

    // Orders and refunds

    pub async fn update_order_status(&self, id: &str, status: &str) -> Result<ApiResponse<Value>> {
        self.mutate(
            Method::PUT,
            self.url(&["order", id, "status"])?,
            Some(&json!({ "status": status })),
        )
        .await
    }

    pub async fn approve_refund(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.mutate::<Value>(Method::PUT, self.url(&["refunds", id, "approve"])?, None)
            .await
    }

    pub async fn reject_refund(&self, id: &str, reason: &str) -> Result<ApiResponse<Value>> {
        self.mutate(
            Method::PUT,
            self.url(&["refunds", id, "reject"])?,
            Some(&json!({ "reason": reason })),
        )
        .await
    }

    pub async fn customer_orders(&self) -> Result<Vec<Value>> {
        self.get("/customer/orders").await
    }

    pub async fn customer_order(&self, id: &str) -> Result<Value> {
        self.fetch_data(self.url(&["customer", "orders", id])?).await
    }

    // Dashboards and vendor profile

    pub async fn dashboard(&self) -> Result<Value> {
        self.get("/dashboard").await
    }

    pub async fn vendor_profile(&self) -> Result<Value> {
        self.get("/vendor/profile").await
    }

    pub async fn update_vendor_profile(&self, profile: &Value) -> Result<ApiResponse<Value>> {
        self.send(Method::PUT, "/vendor/profile", Some(profile)).await
    }

    pub async fn vendor_orders(&self) -> Result<Vec<Value>> {
        self.get("/vendor/orders").await
    }

    pub async fn vendor_products(&self) -> Result<Vec<Value>> {
        self.get("/vendor/products").await
    }

    pub async fn vendor_banners(&self) -> Result<Vec<Value>> {
        self.get("/vendor/banners").await
    }

    // Cart

    pub async fn cart(&self) -> Result<Value> {
        self.get("/cart").await
    }

    pub async fn add_to_cart(&self, product_id: &str, quantity: u32) -> Result<ApiResponse<Value>> {
        self.send(
            Method::POST,
            "/cart",
            Some(&json!({ "productId": product_id, "quantity": quantity })),
        )
        .await
    }

    pub async fn update_cart_item(&self, item_id: &str, quantity: u32) -> Result<ApiResponse<Value>> {
        self.send(
            Method::PUT,
            "/cart/item",
            Some(&json!({ "itemId": item_id, "quantity": quantity })),
        )
        .await
    }

    pub async fn remove_from_cart(&self, item_id: &str) -> Result<ApiResponse<Value>> {
        self.mutate::<Value>(Method::DELETE, self.url(&["cart", "item", item_id])?, None)
            .await
    }

    pub async fn clear_cart(&self) -> Result<ApiResponse<Value>> {
        self.send::<Value>(Method::DELETE, "/cart", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{keys, MemoryStorage, SessionStorage};

    fn client(base: &str) -> Result<ApiClient> {
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "t1").unwrap();
        ApiClient::new(base, Arc::new(SessionContext::new(Arc::new(storage))))
    }

    #[test]
    fn test_base_url_is_normalized() {
        let api = client("http://localhost:4000/api/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:4000/api");
        assert_eq!(
            api.path_url("/order").unwrap().as_str(),
            "http://localhost:4000/api/order"
        );
        assert_eq!(
            api.path_url("cart/").unwrap().as_str(),
            "http://localhost:4000/api/cart"
        );
        assert_eq!(
            api.path_url("/auth/all-users?role=vendor").unwrap().as_str(),
            "http://localhost:4000/api/auth/all-users?role=vendor"
        );
    }

    #[test]
    fn test_root_base_url() {
        let api = client("http://localhost:4000").unwrap();
        assert_eq!(api.url(&["order"]).unwrap().path(), "/order");
    }

    #[test]
    fn test_ids_are_single_encoded_segments() {
        let api = client("http://localhost:4000/api").unwrap();

        let url = api.item_url(Resource::Orders, "a/b?c").unwrap();
        assert_eq!(url.path(), "/api/order/a%2Fb%3Fc");
        assert_eq!(url.query(), None);

        let url = api.url(&["refunds", "r 1", "approve"]).unwrap();
        assert_eq!(url.path(), "/api/refunds/r%201/approve");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let api = client("http://localhost:4000/api").unwrap();
        assert!(matches!(api.item_url(Resource::Orders, ".."), Err(Error::InvalidId(_))));
        assert!(matches!(api.item_url(Resource::Orders, ""), Err(Error::InvalidId(_))));
        assert!(matches!(api.path_url("/customer/orders/.."), Err(Error::InvalidId(_))));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(client("not a url"), Err(Error::Config(_))));
        assert!(matches!(client("mailto:ops@shop.test"), Err(Error::Config(_))));
    }
}
