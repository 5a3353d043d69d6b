//! Data-access layer for the resource catalog.
//!
//! This module defines the [`Catalog`] trait that the application talks to.
//! Two implementations ship with the crate:
//!
//! - [`MockCatalog`] serves the built-in fixtures after a randomized delay and
//!   fails a configurable fraction of requests, mimicking a flaky backend.
//! - [`ScriptedCatalog`] is a deterministic double: no delay, and failures only
//!   when asked for with [`ScriptedCatalog::fail_next`].
//!
//! Callers are expected to recover from every [`CatalogError`]; nothing coming
//! out of this layer is fatal.

mod envelope;
pub mod fixtures;
mod mock;
mod scripted;

pub use envelope::{generate_request_id, ApiError, ApiResponse, HealthStatus};
pub use mock::MockCatalog;
pub use scripted::ScriptedCatalog;

use async_trait::async_trait;

use crate::models::{DetailResource, FilterGroup, Resource, Suggestion};

bitflags::bitflags! {
    /// Operations a catalog supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CatalogCapabilities: u32 {
        const SEARCH = 1 << 0;
        const DETAIL = 1 << 1;
        const SUGGESTIONS = 1 << 2;
        const FILTERS = 1 << 3;
        const SUMMARY = 1 << 4;
    }
}

/// The Catalog trait is the interface between the application and its data source.
///
/// Only [`Catalog::search`] is required; the other lookups default to
/// [`CatalogError::NotImplemented`] and should be advertised through
/// [`Catalog::capabilities`] when overridden.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this catalog
    fn id(&self) -> &str;

    /// Human-readable name of this catalog
    fn name(&self) -> &str;

    /// Describe the capabilities of this catalog
    fn capabilities(&self) -> CatalogCapabilities {
        CatalogCapabilities::SEARCH
    }

    fn supports_detail(&self) -> bool {
        self.capabilities().contains(CatalogCapabilities::DETAIL)
    }

    fn supports_suggestions(&self) -> bool {
        self.capabilities().contains(CatalogCapabilities::SUGGESTIONS)
    }

    fn supports_summary(&self) -> bool {
        self.capabilities().contains(CatalogCapabilities::SUMMARY)
    }

    /// Resources matching the free-text query; an empty query returns everything
    async fn search(&self, query: &str) -> Result<Vec<Resource>, CatalogError>;

    /// Full record for one resource
    async fn detail(&self, _id: &str) -> Result<DetailResource, CatalogError> {
        Err(CatalogError::NotImplemented)
    }

    /// Typeahead suggestions, at most `limit` of them
    async fn suggestions(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<Suggestion>, CatalogError> {
        Err(CatalogError::NotImplemented)
    }

    /// The facet catalog
    async fn filters(&self) -> Result<Vec<FilterGroup>, CatalogError> {
        Err(CatalogError::NotImplemented)
    }

    /// Generated summary text for a resource
    async fn summary(&self, _id: &str) -> Result<String, CatalogError> {
        Err(CatalogError::NotImplemented)
    }
}

/// Errors that can occur when talking to a catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// The requested operation is not implemented for this catalog
    #[error("Operation not implemented for this catalog")]
    NotImplemented,

    /// Network or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Payload could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl CatalogError {
    /// Whether retrying the same request might succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Network(_))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(format!("JSON: {}", err))
    }
}
