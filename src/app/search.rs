//! The search store: one owner for query, criteria, sort, paging and results.
//!
//! Mutations go through methods; the result views are computed on demand by
//! [`SearchStore::view`] from the fetched results. Committed facets are not
//! part of that derivation: they only drive the active-filter chips and the
//! `facets` URL parameter.

use crate::catalog::Catalog;
use crate::models::{
    AdvancedFilters, Resource, SearchCriteria, SelectedFilters, SortBy, SortOrder, ViewMode,
};
use crate::pipeline::criteria::{seed_criteria, valid_criteria};
use crate::pipeline::{
    apply_advanced_filters, is_advanced_search_active, paginate, sorted, PageInfo,
};
use crate::routes::{Route, SearchParams};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Shown when a search request fails
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed. Please try again.";

/// Sorted results with the current page cut out of them
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub results: Vec<Resource>,
    pub page_info: PageInfo,
}

impl ResultsView {
    /// Results on the current page
    pub fn page(&self) -> &[Resource] {
        paginate(&self.results, self.page_info.page, self.page_info.page_size)
    }
}

#[derive(Debug, Clone)]
pub struct SearchStore {
    query: String,
    criteria: Vec<SearchCriteria>,
    filters: AdvancedFilters,
    sort_by: SortBy,
    sort_order: SortOrder,
    view_mode: ViewMode,
    page: usize,
    page_size: usize,
    results: Vec<Resource>,
    loading: bool,
    error: Option<String>,
    has_searched: bool,
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl SearchStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            criteria: Vec::new(),
            filters: AdvancedFilters::default(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            view_mode: ViewMode::default(),
            page: 1,
            page_size: page_size.max(1),
            results: Vec::new(),
            loading: false,
            error: None,
            has_searched: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn criteria(&self) -> &[SearchCriteria] {
        &self.criteria
    }

    pub fn filters(&self) -> &AdvancedFilters {
        &self.filters
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn results(&self) -> &[Resource] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Take query, criteria and filters from the URL
    pub fn load_params(&mut self, params: &SearchParams) {
        self.query = params.q.clone();
        self.criteria = params.criteria.clone();
        self.filters = params.filters.clone().unwrap_or_default();
        self.has_searched = params.has_search();
        self.page = 1;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Pick a sort key. Picking the current key flips the direction; a new
    /// key starts descending. Either way paging restarts.
    pub fn set_sort(&mut self, sort_by: SortBy) {
        if self.sort_by == sort_by {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_by = sort_by;
            self.sort_order = SortOrder::Descending;
        }
        self.page = 1;
        tracing::debug!("Sorting by {} {}", self.sort_by, self.sort_order.as_str());
    }

    /// Set the direction outright, for callers that name both key and order
    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.sort_order = sort_order;
        self.page = 1;
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Move to a 1-based page; the view clamps it into range
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn is_advanced_search_active(&self) -> bool {
        is_advanced_search_active(&self.query, &self.criteria, &self.filters)
    }

    /// Whether the results area is shown at all
    pub fn should_show_results(&self) -> bool {
        self.has_searched && (!self.query.is_empty() || self.is_advanced_search_active())
    }

    /// Fetch results for the current query. Failures leave an empty result
    /// set and an error message rather than an `Err`.
    pub async fn refresh(&mut self, catalog: &dyn Catalog) {
        if !self.should_show_results() {
            self.results.clear();
            self.error = None;
            return;
        }

        self.loading = true;
        self.error = None;
        match catalog.search(&self.query).await {
            Ok(results) => {
                self.results = apply_advanced_filters(results, &self.filters);
                tracing::debug!(
                    "Search {:?} kept {} results after advanced filters",
                    self.query,
                    self.results.len()
                );
            }
            Err(e) => {
                tracing::warn!("Error fetching search results: {}", e);
                self.results.clear();
                self.error = Some(SEARCH_FAILED_MESSAGE.to_string());
            }
        }
        self.loading = false;
    }

    /// Fetched results in display order
    pub fn sorted(&self) -> Vec<Resource> {
        sorted(self.results.clone(), self.sort_by, self.sort_order, &self.query)
    }

    /// Paging figures for the fetched results
    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.page_size, self.results.len())
    }

    /// Results on the current page, in display order
    pub fn page_results(&self) -> Vec<Resource> {
        self.view().page().to_vec()
    }

    pub fn view(&self) -> ResultsView {
        let results = self.sorted();
        let page_info = PageInfo::new(self.page, self.page_size, results.len());
        ResultsView { results, page_info }
    }

    /// Rows the advanced dialog opens with
    pub fn advanced_rows(&self) -> Vec<SearchCriteria> {
        seed_criteria(&self.criteria, &self.query)
    }

    /// Store the advanced dialog's rows and return the URL to navigate to.
    ///
    /// All rows are kept when at least one is filled; the URL carries only
    /// the filled ones.
    pub fn submit_advanced(
        &mut self,
        criteria: Vec<SearchCriteria>,
        filters: AdvancedFilters,
        facets: &SelectedFilters,
    ) -> String {
        let valid = valid_criteria(&criteria);
        self.criteria = if valid.is_empty() { Vec::new() } else { criteria };
        self.filters = filters.clone();
        self.has_searched = true;
        self.page = 1;

        let params = SearchParams {
            q: self.query.trim().to_string(),
            criteria: valid,
            filters: filters.is_active().then_some(filters),
            facets: facets.clone(),
        };
        Route::Search(params).to_url()
    }

    /// Back to a blank search
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScriptedCatalog;
    use crate::models::{ResourceType, SearchField};

    fn searched(query: &str) -> SearchStore {
        let mut store = SearchStore::new(2);
        store.load_params(&SearchParams::query(query));
        store
    }

    #[test]
    fn test_sort_toggle_and_page_reset() {
        let mut store = SearchStore::default();
        store.set_page(3);

        store.set_sort(SortBy::Relevance);
        assert_eq!(store.sort_order(), SortOrder::Ascending);
        assert_eq!(store.page(), 1);

        store.set_sort(SortBy::Citations);
        assert_eq!(store.sort_by(), SortBy::Citations);
        assert_eq!(store.sort_order(), SortOrder::Descending);
    }

    #[tokio::test]
    async fn test_refresh_and_view() {
        let catalog = ScriptedCatalog::new();
        let mut store = searched("e");
        store.refresh(&catalog).await;

        let view = store.view();
        assert!(view.results.len() > 2);
        assert_eq!(view.page().len(), 2);
        assert_eq!(view.page_info.total_pages, view.results.len().div_ceil(2));
        assert_eq!(store.page_info(), view.page_info);
        assert_eq!(store.page_results(), view.page());
    }

    #[tokio::test]
    async fn test_no_search_without_query() {
        let catalog = ScriptedCatalog::new();
        let mut store = SearchStore::default();
        store.refresh(&catalog).await;

        assert!(!store.should_show_results());
        assert!(store.results().is_empty());
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_sets_error() {
        let catalog = ScriptedCatalog::new();
        catalog.fail_next(1);
        let mut store = searched("learning");
        store.refresh(&catalog).await;

        assert_eq!(store.error(), Some(SEARCH_FAILED_MESSAGE));
        assert!(store.results().is_empty());
        assert!(!store.is_loading());

        store.refresh(&catalog).await;
        assert_eq!(store.error(), None);
        assert!(!store.results().is_empty());
    }

    #[tokio::test]
    async fn test_advanced_filters_apply_on_fetch() {
        let catalog = ScriptedCatalog::new();
        let mut store = SearchStore::default();
        store.load_params(&SearchParams {
            filters: Some(AdvancedFilters::default().format("book")),
            ..SearchParams::default()
        });
        assert!(store.should_show_results());

        store.refresh(&catalog).await;
        assert!(!store.results().is_empty());
        assert!(store
            .results()
            .iter()
            .all(|r| r.resource_type == ResourceType::Book));
    }

    #[test]
    fn test_submit_advanced() {
        let mut store = searched("ai");
        let rows = vec![
            SearchCriteria::new(SearchField::Author, "Chen"),
            SearchCriteria::new(SearchField::Title, " "),
            SearchCriteria::new(SearchField::Keyword, ""),
        ];

        let url = store.submit_advanced(rows, AdvancedFilters::default(), &SelectedFilters::new());
        assert_eq!(store.criteria().len(), 3);

        let Route::Search(params) = Route::parse(&url).unwrap() else {
            panic!("expected search route");
        };
        assert_eq!(params.q, "ai");
        assert_eq!(params.criteria.len(), 1);
        assert_eq!(params.filters, None);

        let blank = vec![SearchCriteria::new(SearchField::Keyword, "")];
        store.submit_advanced(blank, AdvancedFilters::default(), &SelectedFilters::new());
        assert!(store.criteria().is_empty());
    }
}
