//! Simulated catalog service with randomized latency and failure injection.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use super::envelope::{generate_request_id, ApiError, ApiResponse, HealthStatus};
use super::{fixtures, Catalog, CatalogCapabilities, CatalogError};
use crate::config::CatalogConfig;
use crate::models::{DetailResource, FilterGroup, Resource, Suggestion};

/// Catalog backed by the built-in fixtures.
///
/// Each request sleeps for a random duration in
/// `[min_latency_ms, max_latency_ms)` and then fails with probability
/// `failure_rate`. Successful replies are wrapped in an [`ApiResponse`].
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    config: CatalogConfig,
}

impl MockCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    /// A catalog that answers immediately and never fails
    pub fn instant() -> Self {
        Self::new(CatalogConfig::instant())
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Decide the fate of one request up front so no RNG lives across an await
    fn roll(&self) -> (String, Duration, bool) {
        let mut rng = rand::thread_rng();
        let request_id = generate_request_id(&mut rng);

        let min = self.config.min_latency_ms;
        let max = self.config.max_latency_ms;
        let delay_ms = if max > min {
            rng.gen_range(min..max)
        } else {
            min
        };

        let fail = self.config.failure_rate > 0.0 && rng.gen::<f64>() < self.config.failure_rate;
        (request_id, Duration::from_millis(delay_ms), fail)
    }

    /// Issue a simulated request for `endpoint` that resolves to `data`
    pub async fn request<T>(&self, endpoint: &str, data: T) -> Result<ApiResponse<T>, ApiError> {
        let (request_id, delay, fail) = self.roll();

        tracing::debug!(
            "GET {}{} ({}, {}ms)",
            self.config.base_url,
            endpoint,
            request_id,
            delay.as_millis()
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if fail {
            let error = ApiError::network(request_id);
            tracing::warn!("Simulated failure for {}: {}", endpoint, error);
            return Err(error);
        }

        Ok(ApiResponse::ok(data, request_id))
    }

    /// Service health endpoint
    pub async fn health_check(&self) -> Result<ApiResponse<HealthStatus>, ApiError> {
        self.request("/api/health", HealthStatus::default()).await
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Catalog"
    }

    fn capabilities(&self) -> CatalogCapabilities {
        CatalogCapabilities::all()
    }

    async fn search(&self, query: &str) -> Result<Vec<Resource>, CatalogError> {
        let endpoint = format!("/api/search?q={}", urlencoding::encode(query));
        let response = self
            .request(&endpoint, fixtures::search_resources(query))
            .await?;
        tracing::debug!("Search {:?} returned {} results", query, response.data.len());
        Ok(response.data)
    }

    async fn detail(&self, id: &str) -> Result<DetailResource, CatalogError> {
        let endpoint = format!("/api/resources/{}", urlencoding::encode(id));
        let response = self.request(&endpoint, fixtures::detail_resource(id)).await?;
        response
            .data
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, CatalogError> {
        let endpoint = format!(
            "/api/suggestions?q={}&limit={}",
            urlencoding::encode(query),
            limit
        );
        let response = self
            .request(&endpoint, fixtures::suggestions(query, limit))
            .await?;
        Ok(response.data)
    }

    async fn filters(&self) -> Result<Vec<FilterGroup>, CatalogError> {
        let response = self.request("/api/filters", fixtures::filter_groups()).await?;
        Ok(response.data)
    }

    async fn summary(&self, id: &str) -> Result<String, CatalogError> {
        let endpoint = format!("/api/resources/{}/summary", urlencoding::encode(id));
        let response = self
            .request(&endpoint, fixtures::AI_SUMMARY.to_string())
            .await?;
        Ok(response.data)
    }
}
