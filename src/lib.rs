//! # Scholar Discovery
//!
//! A discovery front end for scholarly resources: free-text and advanced
//! search over a simulated catalog, facet filtering with a draft/committed
//! split, sorting and pagination, saved collections, a mock sign-in flow and
//! export to CSV, JSON, RIS and BibTeX.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Resource, SearchCriteria, SelectedFilters, etc.)
//! - [`catalog`]: The [`Catalog`] trait and its simulated and scripted implementations
//! - [`pipeline`]: Pure search/filter/sort/paginate stages
//! - [`state`]: Client-side stores (facet selection, collections, auth, suggestions)
//! - [`routes`]: Routes and the search state carried in their URLs
//! - [`export`]: Citation strings and export formats
//! - [`app`]: The [`App`] façade that renders routes into pages
//! - [`config`]: Configuration management
//! - [`utils`]: Terminal display helpers for the CLI

pub mod app;
pub mod catalog;
pub mod config;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use app::{App, Page};
pub use catalog::{Catalog, CatalogError, MockCatalog};
pub use models::{DetailResource, Resource};
pub use routes::{Route, SearchParams};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
