//! Application façade tying the catalog, the stores and session storage
//! together behind route navigation.

mod search;

pub use search::{ResultsView, SearchStore, DEFAULT_PAGE_SIZE, SEARCH_FAILED_MESSAGE};

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::Config;
use crate::export::detail_citation;
use crate::models::{
    Collection, DetailResource, FilterGroup, Resource, SavedResource, SelectedFilters, User,
};
use crate::pipeline::criteria::describe_criteria;
use crate::routes::{back_to_search_href, Route, SearchParams};
use crate::state::{
    AuthStore, CollectionError, CollectionStore, EditMode, FilterLayout, FilterPanel, FilterSelection,
    SaveOutcome, SessionStorage, SuggestionBox,
};

/// Terms offered as one-click searches on the home page
pub const QUICK_SEARCH_TERMS: [&str; 4] = [
    "machine learning",
    "climate change",
    "quantum computing",
    "artificial intelligence",
];

/// Home page content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub quick_search: Vec<String>,
    pub saved_count: usize,
    pub user: Option<User>,
}

/// A committed facet shown as a removable chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    pub group_id: String,
    pub option_id: String,
    pub label: String,
}

/// A rendered results page
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub query: String,
    /// "field: \"value\" AND ..." when advanced criteria are in play
    pub criteria_summary: Option<String>,
    /// "Showing a-b of n Results"
    pub summary: String,
    pub view: ResultsView,
    pub active_filters: Vec<ActiveFilter>,
    pub filter_groups: Vec<FilterGroup>,
    pub error: Option<String>,
}

/// Outcome of opening a detail route
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPage {
    Found {
        resource: Box<DetailResource>,
        citation: String,
        saved: bool,
        back_href: String,
    },
    NotFound {
        id: String,
        back_href: String,
    },
    /// The request failed; the user may retry
    Failed {
        message: String,
        back_href: String,
    },
}

/// Saved page content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPage {
    pub collections: Vec<Collection>,
    pub saved_resources: Vec<SavedResource>,
}

/// Auth state as shown on the sign-in, sign-up and test pages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPage {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub error: Option<String>,
    /// Where an already signed-in visitor is sent
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home(HomePage),
    /// `/search` with nothing to search for
    StartSearch,
    Search(Box<SearchPage>),
    Detail(DetailPage),
    Saved(SavedPage),
    SignIn(AuthPage),
    SignUp(AuthPage),
    TestAuth(AuthPage),
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home(_) => "Discover Scholarly Resources",
            Page::StartSearch => "Start Your Search",
            Page::Search(_) => "Search Results",
            Page::Detail(DetailPage::Found { .. }) => "Resource Details",
            Page::Detail(DetailPage::NotFound { .. }) => "Resource Not Found",
            Page::Detail(DetailPage::Failed { .. }) => "Something Went Wrong",
            Page::Saved(_) => "Saved Resources",
            Page::SignIn(_) => "Sign In",
            Page::SignUp(_) => "Sign Up",
            Page::TestAuth(_) => "Authentication Test Page",
        }
    }
}

/// The running application
#[derive(Debug)]
pub struct App {
    config: Config,
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn SessionStorage>,
    search: SearchStore,
    filters: FilterSelection,
    layout: FilterLayout,
    filter_groups: Vec<FilterGroup>,
    params: SearchParams,
    collections: CollectionStore,
    auth: AuthStore,
}

impl App {
    /// Build the app and restore the previous session from `storage`
    pub fn new(config: Config, catalog: Arc<dyn Catalog>, storage: Arc<dyn SessionStorage>) -> Self {
        let mut auth = AuthStore::new(Arc::clone(&storage));
        auth.initialize();
        let collections = CollectionStore::restore(storage.as_ref());

        Self {
            search: SearchStore::new(config.search.page_size),
            config,
            catalog,
            storage,
            filters: FilterSelection::new(),
            layout: FilterLayout::new(),
            filter_groups: Vec::new(),
            params: SearchParams::default(),
            collections,
            auth,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn search(&self) -> &SearchStore {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchStore {
        &mut self.search
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn layout(&self) -> &FilterLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut FilterLayout {
        &mut self.layout
    }

    pub fn collections(&self) -> &CollectionStore {
        &self.collections
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// Type-ahead box wired to this app's catalog and search settings
    pub fn suggestion_box(&self) -> SuggestionBox {
        SuggestionBox::new(
            Arc::clone(&self.catalog),
            self.config.search.debounce(),
            self.config.search.suggestion_limit,
        )
    }

    /// Navigate to `route` and render it
    pub async fn open(&mut self, route: &Route) -> Page {
        tracing::debug!("Opening {}", route);
        match route {
            Route::Home => Page::Home(HomePage {
                quick_search: QUICK_SEARCH_TERMS.iter().map(|t| t.to_string()).collect(),
                saved_count: self.collections.saved_resources().len(),
                user: self.auth.user().cloned(),
            }),
            Route::Search(params) => self.open_search(params).await,
            Route::Detail { id, params } => Page::Detail(self.open_detail(id, params).await),
            Route::Saved => Page::Saved(SavedPage {
                collections: self.collections.collections().to_vec(),
                saved_resources: self.collections.saved_resources().to_vec(),
            }),
            Route::SignIn => Page::SignIn(self.auth_page(true)),
            Route::SignUp => Page::SignUp(self.auth_page(true)),
            Route::TestAuth => Page::TestAuth(self.auth_page(false)),
        }
    }

    /// Parse and open a path such as `/search?q=ml`
    pub async fn open_url(&mut self, url: &str) -> Result<Page, crate::routes::RouteError> {
        let route = Route::parse(url)?;
        Ok(self.open(&route).await)
    }

    async fn open_search(&mut self, params: &SearchParams) -> Page {
        self.params = params.clone();
        self.search.load_params(params);
        self.filters.sync(params.facets.clone());

        if !self.search.should_show_results() {
            return Page::StartSearch;
        }

        self.search.refresh(self.catalog.as_ref()).await;
        self.load_filter_groups().await;
        Page::Search(Box::new(self.search_page()))
    }

    /// Render the current results without refetching
    pub fn search_page(&self) -> SearchPage {
        let view = self.search.view();
        let criteria = crate::pipeline::criteria::valid_criteria(self.search.criteria());

        SearchPage {
            query: self.search.query().to_string(),
            criteria_summary: (!criteria.is_empty()).then(|| describe_criteria(&criteria)),
            summary: view.page_info.summary(self.search.is_loading()),
            view,
            active_filters: self.active_filters(),
            filter_groups: self.filter_groups.clone(),
            error: self.search.error().map(str::to_string),
        }
    }

    async fn open_detail(&mut self, id: &str, params: &SearchParams) -> DetailPage {
        let back_href = back_to_search_href(&params.q);
        match self.catalog.detail(id).await {
            Ok(resource) => DetailPage::Found {
                citation: detail_citation(&resource),
                saved: self.collections.is_saved(resource.id()),
                resource: Box::new(resource),
                back_href,
            },
            Err(CatalogError::NotFound(_)) => DetailPage::NotFound {
                id: id.to_string(),
                back_href,
            },
            Err(e) => {
                tracing::warn!("Failed to load resource {}: {}", id, e);
                DetailPage::Failed {
                    message: e.to_string(),
                    back_href,
                }
            }
        }
    }

    /// Request the AI summary of a resource. Failures yield `None`.
    pub async fn summary(&self, id: &str) -> Option<String> {
        if !self.catalog.supports_summary() {
            return None;
        }
        match self.catalog.summary(id).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!("Failed to load summary for {}: {}", id, e);
                None
            }
        }
    }

    fn auth_page(&self, redirect_when_signed_in: bool) -> AuthPage {
        let signed_in = self.auth.is_authenticated();
        AuthPage {
            is_authenticated: signed_in,
            user: self.auth.user().cloned(),
            error: self.auth.error().map(str::to_string),
            redirect: (redirect_when_signed_in && signed_in).then(|| Route::Home.to_url()),
        }
    }

    /// Fetch the facet catalog once; a failure leaves the sidebar empty
    pub async fn load_filter_groups(&mut self) -> &[FilterGroup] {
        if self.filter_groups.is_empty() {
            match self.catalog.filters().await {
                Ok(groups) => self.filter_groups = groups,
                Err(e) => tracing::warn!("Failed to load filters: {}", e),
            }
        }
        &self.filter_groups
    }

    fn active_filters(&self) -> Vec<ActiveFilter> {
        self.filters
            .committed()
            .iter()
            .map(|(group_id, option_id)| {
                let label = self
                    .filter_groups
                    .iter()
                    .find(|group| group.id == group_id)
                    .and_then(|group| group.label_of(option_id))
                    .unwrap_or(option_id);
                ActiveFilter {
                    group_id: group_id.to_string(),
                    option_id: option_id.to_string(),
                    label: label.to_string(),
                }
            })
            .collect()
    }

    /// Check or uncheck a facet in the sidebar; results follow at once
    pub fn toggle_facet(&mut self, group_id: &str, option_id: &str, checked: bool) {
        self.filters.toggle(group_id, option_id, checked);
        self.params.facets = self.filters.committed().clone();
    }

    /// Open the filter dialog. Edits stay in the draft until applied with
    /// [`App::apply_filters`]; dropping the panel discards them.
    pub fn filter_dialog(&mut self) -> FilterPanel<'_> {
        self.filters.open_panel(EditMode::Dialog)
    }

    /// Commit the draft facets and return the search URL carrying them
    pub fn apply_filters(&mut self) -> String {
        self.filters.apply();
        self.facets_url(self.filters.committed().clone())
    }

    /// Drop every facet and return the search URL without them
    pub fn clear_filters(&mut self) -> String {
        self.filters.clear_committed();
        self.facets_url(SelectedFilters::new())
    }

    /// Remove one active-filter chip and return the updated URL
    pub fn remove_filter(&mut self, group_id: &str, option_id: &str) -> String {
        self.filters.remove_committed(group_id, option_id);
        self.facets_url(self.filters.committed().clone())
    }

    fn facets_url(&mut self, facets: SelectedFilters) -> String {
        self.params.facets = facets;
        Route::Search(self.params.clone()).to_url()
    }

    /// Save or unsave a resource and persist the change
    pub fn toggle_save(&mut self, resource: &Resource) -> SaveOutcome {
        let outcome = self.collections.toggle_save(resource);
        self.persist_collections();
        outcome
    }

    /// Create a named collection and persist it
    pub fn create_collection(
        &mut self,
        name: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> Collection {
        let collection = self
            .collections
            .create_collection(name, description, is_public)
            .clone();
        self.persist_collections();
        collection
    }

    /// File a resource under a specific collection and persist the change
    pub fn save_to_collection(
        &mut self,
        resource: &Resource,
        collection_id: &str,
    ) -> Result<SavedResource, CollectionError> {
        let saved = self
            .collections
            .save_to_collection(resource, collection_id)?
            .clone();
        self.persist_collections();
        Ok(saved)
    }

    /// Find a resource by id, first among the search results, then through
    /// the detail lookup
    pub async fn find_resource(&self, id: &str) -> Result<Resource, CatalogError> {
        let all = self.catalog.search("").await?;
        if let Some(found) = all.into_iter().find(|resource| resource.id == id) {
            return Ok(found);
        }
        self.catalog.detail(id).await.map(|detail| detail.resource)
    }

    /// Seed the account's collections and persist them
    pub fn load_collections(&mut self) {
        self.collections.load_collections();
        self.persist_collections();
    }

    fn persist_collections(&self) {
        if let Err(e) = self.collections.persist(self.storage.as_ref()) {
            tracing::warn!("Failed to persist collections: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScriptedCatalog;
    use crate::state::MemoryStorage;

    fn app() -> (Arc<ScriptedCatalog>, App) {
        let catalog = Arc::new(ScriptedCatalog::new());
        let app = App::new(
            Config::default(),
            catalog.clone(),
            Arc::new(MemoryStorage::new()),
        );
        (catalog, app)
    }

    #[tokio::test]
    async fn test_blank_search_shows_start_page() {
        let (catalog, mut app) = app();
        let page = app.open_url("/search").await.unwrap();
        assert_eq!(page, Page::StartSearch);
        assert_eq!(page.title(), "Start Your Search");
        assert_eq!(catalog.calls(), 0);
    }

    fn result_ids(page: &SearchPage) -> Vec<&str> {
        page.view.results.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_facets_show_as_chips_without_narrowing_results() {
        let (_, mut app) = app();
        let Page::Search(plain) = app.open_url("/search?q=learning").await.unwrap() else {
            panic!("expected results page");
        };
        let Page::Search(faceted) = app
            .open_url(r#"/search?q=learning&facets={"type":["book"]}"#)
            .await
            .unwrap()
        else {
            panic!("expected results page");
        };

        assert_eq!(result_ids(&plain), ["1", "2"]);
        assert_eq!(result_ids(&faceted), ["1", "2"]);
        assert_eq!(faceted.summary, "Showing 2 of 2 Results");
        assert_eq!(faceted.active_filters.len(), 1);
        assert_eq!(faceted.active_filters[0].label, "Books");
        assert_eq!(faceted.filter_groups.len(), 5);
    }

    #[tokio::test]
    async fn test_search_failure_is_not_fatal() {
        let (catalog, mut app) = app();
        catalog.fail_next(1);
        let Page::Search(page) = app.open_url("/search?q=learning").await.unwrap() else {
            panic!("expected results page");
        };
        assert!(page.view.results.is_empty());
        assert_eq!(page.error.as_deref(), Some(SEARCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_dialog_apply_and_clear() {
        let (_, mut app) = app();
        app.open_url("/search?q=learning").await.unwrap();

        {
            let mut dialog = app.filter_dialog();
            dialog.toggle("type", "article", true);
        }
        assert!(app.filters().committed().is_empty());

        {
            let mut dialog = app.filter_dialog();
            dialog.toggle("type", "article", true);
            dialog.apply();
        }
        let url = app.apply_filters();
        assert!(url.starts_with("/search?q=learning&facets="));
        let page = app.search_page();
        assert_eq!(page.active_filters.len(), 1);
        assert_eq!(page.view.results.len(), 2);

        assert_eq!(app.clear_filters(), "/search?q=learning");
        assert!(app.search_page().active_filters.is_empty());
    }

    #[tokio::test]
    async fn test_detail_pages() {
        let (catalog, mut app) = app();

        let page = app.open_url("/detail/1?q=ml").await.unwrap();
        let Page::Detail(DetailPage::Found { resource, back_href, saved, .. }) = page else {
            panic!("expected detail page");
        };
        assert_eq!(resource.id(), "1");
        assert_eq!(back_href, "/search?q=ml");
        assert!(!saved);

        let page = app.open_url("/detail/999").await.unwrap();
        assert_eq!(
            page,
            Page::Detail(DetailPage::NotFound {
                id: "999".to_string(),
                back_href: "/search".to_string(),
            })
        );

        catalog.fail_next(1);
        let page = app.open_url("/detail/1").await.unwrap();
        assert!(matches!(page, Page::Detail(DetailPage::Failed { .. })));
    }

    #[tokio::test]
    async fn test_collections_persist_across_sessions() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());

        let mut app = App::new(Config::default(), catalog.clone(), Arc::clone(&storage));
        let reading = app.create_collection("Reading list", None, false);
        let resource = app.find_resource("4").await.unwrap();
        app.save_to_collection(&resource, &reading.id).unwrap();
        assert!(matches!(
            app.save_to_collection(&resource, &reading.id),
            Err(CollectionError::AlreadySaved { .. })
        ));

        let reopened = App::new(Config::default(), catalog, storage);
        assert!(reopened.collections().is_saved("4"));
        assert_eq!(
            reopened.collections().collection(&reading.id).unwrap().resource_count,
            1
        );
    }

    #[tokio::test]
    async fn test_auth_pages_and_saved() {
        let (catalog, mut app) = app();
        assert!(app.auth_mut().sign_in("ada@example.com", "secret"));

        let Page::SignIn(auth) = app.open(&Route::SignIn).await else {
            panic!("expected sign-in page");
        };
        assert_eq!(auth.redirect.as_deref(), Some("/"));

        let resource = catalog.search("climate").await.unwrap().remove(0);
        assert_eq!(app.toggle_save(&resource), SaveOutcome::Saved);

        let Page::Saved(saved) = app.open(&Route::Saved).await else {
            panic!("expected saved page");
        };
        assert_eq!(saved.saved_resources.len(), 1);

        let Page::Home(home) = app.open(&Route::Home).await else {
            panic!("expected home page");
        };
        assert_eq!(home.saved_count, 1);
        assert_eq!(home.user.unwrap().email, "ada@example.com");
    }
}
