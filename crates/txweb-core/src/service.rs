//! Transaction service client
//!
//! Four operations against one base resource URL. Each call is a single
//! round trip: no retries, no caching, no timeout beyond the client default.

use async_trait::async_trait;
use std::sync::Arc;
use txweb_config::BackendConfig;

use crate::error::{CoreError, CoreResult};
use crate::models::{Transaction, TransactionFormData, TransactionPage};

// ==================== Service Trait ====================

/// Service reference type
pub type ServiceRef = Arc<dyn TransactionService>;

/// Operations offered by the transaction backend
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Fetch every transaction, in backend order
    async fn list(&self) -> CoreResult<Vec<Transaction>>;

    /// Create a transaction; the backend assigns the identifier
    async fn create(&self, payload: &TransactionFormData) -> CoreResult<Transaction>;

    /// Replace the fields of an existing transaction
    async fn update(&self, id: i64, payload: &TransactionFormData) -> CoreResult<Transaction>;

    /// Remove a transaction
    async fn delete(&self, id: i64) -> CoreResult<()>;
}

// ==================== HTTP Implementation ====================

/// REST client for `{base_url}` and `{base_url}/{id}`
#[derive(Debug, Clone)]
pub struct HttpTransactionService {
    client: reqwest::Client,
    base_url: String,
    list_page_size: usize,
}

impl HttpTransactionService {
    /// Create a client for the given resource URL
    pub fn new(base_url: &str, list_page_size: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            list_page_size,
        }
    }

    /// Create a client from the backend section of the configuration
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.base_url, config.list_page_size)
    }

    /// Get the base resource URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn failed(operation: &str, url: &str, error: reqwest::Error) -> CoreError {
        let error = CoreError::from(error);
        log::warn!("{} {} failed: {}", operation, url, error);
        error
    }
}

#[async_trait]
impl TransactionService for HttpTransactionService {
    async fn list(&self) -> CoreResult<Vec<Transaction>> {
        let url = &self.base_url;
        log::debug!("GET {}?size={}", url, self.list_page_size);

        let page: TransactionPage = self.client
            .get(url)
            .query(&[("size", self.list_page_size)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::failed("GET", url, e))?
            .json()
            .await
            .map_err(|e| Self::failed("GET", url, e))?;

        if let Some(total) = page.total_elements {
            if total > page.content.len() as u64 {
                log::warn!(
                    "Backend reports {} transactions but returned {}; raise backend.list_page_size",
                    total,
                    page.content.len()
                );
            }
        }

        Ok(page.content)
    }

    async fn create(&self, payload: &TransactionFormData) -> CoreResult<Transaction> {
        let url = &self.base_url;
        log::debug!("POST {}", url);

        self.client
            .post(url)
            .json(payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::failed("POST", url, e))?
            .json()
            .await
            .map_err(|e| Self::failed("POST", url, e))
    }

    async fn update(&self, id: i64, payload: &TransactionFormData) -> CoreResult<Transaction> {
        let url = self.item_url(id);
        log::debug!("PUT {}", url);

        self.client
            .put(&url)
            .json(payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::failed("PUT", &url, e))?
            .json()
            .await
            .map_err(|e| Self::failed("PUT", &url, e))
    }

    async fn delete(&self, id: i64) -> CoreResult<()> {
        let url = self.item_url(id);
        log::debug!("DELETE {}", url);

        self.client
            .delete(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::failed("DELETE", &url, e))?;

        Ok(())
    }
}

// ==================== Tests ====================
