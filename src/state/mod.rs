//! Client-side state: facet selections, saved resources, the signed-in user
//! and type-ahead suggestions.

pub mod auth;
pub mod collections;
pub mod filters;
pub mod storage;
pub mod suggest;

pub use auth::{AuthStore, FormErrors, USER_STORAGE_KEY};
pub use collections::{CollectionError, CollectionStore, SaveOutcome};
pub use filters::{EditMode, FilterLayout, FilterPanel, FilterSelection, SelectionCounts};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use suggest::{Debouncer, SuggestionBox, SuggestionState};
