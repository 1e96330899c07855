//! HTTP client for the product catalog.

use bozor_core::ProductId;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::CatalogError;
use super::types::{Category, Product, ProductPage};
use crate::config::CatalogConfig;

/// Longest response body excerpt kept in errors and logs.
const BODY_EXCERPT: usize = 200;

/// Read-only catalog client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    page_size: u32,
}

impl CatalogClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built, or
    /// `CatalogError::InvalidUrl` if the base URL cannot carry a path.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(config.base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("bozor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            page_size: config.page_size,
        })
    }

    /// Configured listing page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// One page of all products. Pages are zero-based.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u32, page_size: u32) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products"])?;
        paginate(&mut url, page, page_size);
        self.get_json(url, "products").await
    }

    /// One page of a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn list_category(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products", "category", slug])?;
        paginate(&mut url, page, page_size);
        self.get_json(url, slug).await
    }

    /// Full-text product search.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products", "search"])?;
        url.query_pairs_mut().append_pair("q", query.trim());
        self.get_json(url, "search").await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        self.get_json(url, &format!("product {id}")).await
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let url = self.endpoint(&["products", "categories"])?;
        self.get_json(url, "categories").await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, CatalogError> {
        tracing::debug!(url = %url, "Catalog request");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what.to_string()));
        }

        // Body as text first for better error diagnostics
        let body = response.text().await?;
        if !status.is_success() {
            let excerpt: String = body.chars().take(BODY_EXCERPT).collect();
            tracing::error!(status = %status, body = %excerpt, "Catalog returned non-success status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: excerpt,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(BODY_EXCERPT).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Decode(e)
        })
    }
}

fn paginate(url: &mut Url, page: u32, page_size: u32) {
    let skip = u64::from(page) * u64::from(page_size);
    url.query_pairs_mut()
        .append_pair("limit", &page_size.to_string())
        .append_pair("skip", &skip.to_string());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::catalog::fail_closed;

    fn client(base_url: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: base_url.parse().unwrap(),
            timeout: Duration::from_secs(5),
            page_size: 12,
        })
        .unwrap()
    }

    /// Serve one canned HTTP response and return the base URL plus a handle
    /// yielding the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0_u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(buf.get(..n).unwrap()).into_owned();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_endpoint_building() {
        let client = client("https://catalog.example/api/");
        let url = client.endpoint(&["products", "category", "home decoration"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://catalog.example/api/products/category/home%20decoration"
        );

        let mut url = client.endpoint(&["products"]).unwrap();
        paginate(&mut url, 2, 12);
        assert_eq!(url.as_str(), "https://catalog.example/api/products?limit=12&skip=24");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = CatalogConfig {
            base_url: "mailto:shop@example.com".parse().unwrap(),
            timeout: Duration::from_secs(1),
            page_size: 12,
        };
        assert!(matches!(
            CatalogClient::new(&config),
            Err(CatalogError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_list_decodes_page() {
        let (base, request) = serve_once(
            "200 OK",
            r#"{"products": [{"id": 3, "title": "Lamp", "price": 20, "discountPercentage": 50}], "total": 1, "skip": 0, "limit": 12}"#,
        )
        .await;

        let page = client(&base).list(0, 12).await.unwrap();
        assert_eq!(page.total, 1);
        let product = page.products.first().unwrap();
        assert_eq!(product.to_line_item().price.amount(), Decimal::from(10));

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /products?limit=12&skip=0 "));
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let (base, request) = serve_once("200 OK", r#"{"products": []}"#).await;
        let page = client(&base).search(" red phone ").await.unwrap();
        assert!(page.products.is_empty());
        assert!(request.await.unwrap().starts_with("GET /products/search?q=red+phone "));
    }

    #[tokio::test]
    async fn test_product_not_found() {
        let (base, _request) = serve_once("404 Not Found", r#"{"message": "nope"}"#).await;
        let err = client(&base).product(ProductId::new(9999)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let (base, _request) = serve_once("503 Service Unavailable", "down").await;
        let err = client(&base).categories().await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_bad_json_is_decode_error() {
        let (base, _request) = serve_once("200 OK", "[{").await;
        let err = client(&base).categories().await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_fails_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(&format!("http://{addr}")).list(0, 12).await;
        assert!(matches!(result, Err(CatalogError::Http(_))));
        let page = fail_closed(result, "listing");
        assert!(page.products.is_empty());
    }
}
