//! Core data models for catalog resources, search criteria and user state.

mod collection;
mod filter;
mod resource;
mod search;
mod user;

pub use collection::{Collection, ResourceSnapshot, SavedResource};
pub use filter::{FilterGroup, FilterKind, FilterOption, SelectedFilters};
pub use resource::{DetailResource, RelatedResource, Resource, ResourceBuilder, ResourceType};
pub use search::{
    AdvancedFilters, CriteriaOperator, SearchCriteria, SearchField, SortBy, SortOrder, ViewMode,
};
pub use user::{Role, User};

/// Typeahead suggestion record; carries the same fields as a saved snapshot
pub type Suggestion = ResourceSnapshot;
