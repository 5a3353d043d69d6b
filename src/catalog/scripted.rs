//! Deterministic catalog for tests.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{fixtures, Catalog, CatalogCapabilities, CatalogError};
use crate::models::{DetailResource, FilterGroup, Resource, Suggestion};
use crate::pipeline::filter::filter_by_query;

#[derive(Debug, Default)]
struct Script {
    results: Option<Vec<Resource>>,
    failures: usize,
    calls: usize,
}

/// A catalog that answers immediately from the fixtures or a configured set,
/// and fails only when told to.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    script: Mutex<Script>,
}

impl ScriptedCatalog {
    /// Create a catalog serving the built-in fixtures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog that searches over `results` instead of the fixtures.
    pub fn with_results(results: Vec<Resource>) -> Self {
        let catalog = Self::new();
        catalog.set_results(results);
        catalog
    }

    /// Replace the searchable result set.
    pub fn set_results(&self, results: Vec<Resource>) {
        self.script().results = Some(results);
    }

    /// Make the next `count` requests fail with a network error.
    pub fn fail_next(&self, count: usize) {
        self.script().failures = count;
    }

    /// Number of requests received so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.script().calls
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call and consume one scripted failure, if any remain
    fn begin(&self) -> Result<MutexGuard<'_, Script>, CatalogError> {
        let mut script = self.script();
        script.calls += 1;
        if script.failures > 0 {
            script.failures -= 1;
            return Err(CatalogError::Network("scripted failure".to_string()));
        }
        Ok(script)
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    fn id(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "Scripted Catalog"
    }

    fn capabilities(&self) -> CatalogCapabilities {
        CatalogCapabilities::all()
    }

    async fn search(&self, query: &str) -> Result<Vec<Resource>, CatalogError> {
        let script = self.begin()?;
        Ok(match &script.results {
            Some(results) => filter_by_query(results, query),
            None => fixtures::search_resources(query),
        })
    }

    async fn detail(&self, id: &str) -> Result<DetailResource, CatalogError> {
        let script = self.begin()?;
        if let Some(results) = &script.results {
            return results
                .iter()
                .find(|resource| resource.id == id)
                .cloned()
                .map(DetailResource::from_resource)
                .ok_or_else(|| CatalogError::NotFound(id.to_string()));
        }
        fixtures::detail_resource(id).ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, CatalogError> {
        self.begin()?;
        Ok(fixtures::suggestions(query, limit))
    }

    async fn filters(&self) -> Result<Vec<FilterGroup>, CatalogError> {
        self.begin()?;
        Ok(fixtures::filter_groups())
    }

    async fn summary(&self, _id: &str) -> Result<String, CatalogError> {
        self.begin()?;
        Ok(fixtures::AI_SUMMARY.to_string())
    }
}
