//! Saved resources and the collections that hold them.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::auth::MOCK_USER_ID;
use super::storage::{SessionStorage, StorageError};
use crate::models::{Collection, Resource, ResourceSnapshot, SavedResource};

/// Storage key for the persisted collections
pub const COLLECTIONS_STORAGE_KEY: &str = "discovery-ui-collections";

/// Id of the collection created on the first quick save
pub const QUICK_COLLECTION_ID: &str = "collection-quick";

/// Result of [`CollectionStore::toggle_save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Removed,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("Collection not found: {0}")]
    UnknownCollection(String),

    #[error("Resource {resource_id} is already in collection {collection_id}")]
    AlreadySaved {
        resource_id: String,
        collection_id: String,
    },
}

/// Collections and saved entries of the current user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStore {
    collections: Vec<Collection>,
    saved_resources: Vec<SavedResource>,
    #[serde(skip)]
    last_id: i64,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn saved_resources(&self) -> &[SavedResource] {
        &self.saved_resources
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    /// Whether any collection holds the resource
    pub fn is_saved(&self, resource_id: &str) -> bool {
        self.saved_resources
            .iter()
            .any(|saved| saved.resource_id == resource_id)
    }

    /// Entries of one collection, oldest first
    pub fn saved_in(&self, collection_id: &str) -> Vec<&SavedResource> {
        self.saved_resources
            .iter()
            .filter(|saved| saved.collection_id == collection_id)
            .collect()
    }

    /// Replace the collections with the seeded account data
    pub fn load_collections(&mut self) {
        let now = Utc::now();
        let mut research = Collection::new("collection-1", "Research Papers", false, MOCK_USER_ID)
            .with_description("Important research papers for my thesis");
        research.created_at = now - Duration::days(1);
        research.resource_count = 5;

        let mut ml = Collection::new("collection-2", "Machine Learning", true, MOCK_USER_ID)
            .with_description("Papers and resources about ML");
        ml.created_at = now - Duration::days(2);
        ml.resource_count = 12;

        self.collections = vec![research, ml];
        tracing::debug!("Loaded {} collections", self.collections.len());
    }

    pub fn create_collection(
        &mut self,
        name: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> &Collection {
        let id = format!("collection-{}", self.next_id());
        let mut collection = Collection::new(id, name, is_public, MOCK_USER_ID);
        collection.description = description.map(str::to_string);
        tracing::info!("Created collection {:?} ({})", collection.name, collection.id);

        let index = self.collections.len();
        self.collections.push(collection);
        &self.collections[index]
    }

    /// Add a resource to a specific collection and bump its count
    pub fn save_to_collection(
        &mut self,
        resource: &Resource,
        collection_id: &str,
    ) -> Result<&SavedResource, CollectionError> {
        if self.collection(collection_id).is_none() {
            return Err(CollectionError::UnknownCollection(collection_id.to_string()));
        }
        if self
            .saved_in(collection_id)
            .iter()
            .any(|saved| saved.resource_id == resource.id)
        {
            return Err(CollectionError::AlreadySaved {
                resource_id: resource.id.clone(),
                collection_id: collection_id.to_string(),
            });
        }

        self.adjust_count(collection_id, true);
        Ok(self.push_saved(resource, collection_id))
    }

    /// Save a resource to the first collection, or remove it everywhere if
    /// it is already saved. Collection counts follow both directions.
    pub fn toggle_save(&mut self, resource: &Resource) -> SaveOutcome {
        if self.is_saved(&resource.id) {
            let holders: Vec<String> = self
                .saved_resources
                .iter()
                .filter(|saved| saved.resource_id == resource.id)
                .map(|saved| saved.collection_id.clone())
                .collect();
            self.saved_resources
                .retain(|saved| saved.resource_id != resource.id);
            for collection_id in &holders {
                self.adjust_count(collection_id, false);
            }
            tracing::info!(
                "Removed {} from {} collection(s)",
                resource.id,
                holders.len()
            );
            return SaveOutcome::Removed;
        }

        if self.collections.is_empty() {
            self.collections.push(
                Collection::new(QUICK_COLLECTION_ID, "Saved", false, MOCK_USER_ID)
                    .with_description("Quick saved resources"),
            );
        }
        let collection_id = self.collections[0].id.clone();
        self.adjust_count(&collection_id, true);
        self.push_saved(resource, &collection_id);
        tracing::info!("Saved {} to {}", resource.id, collection_id);
        SaveOutcome::Saved
    }

    /// Load state written by [`CollectionStore::persist`]. Unreadable data
    /// is logged and leaves an empty store.
    pub fn restore(storage: &dyn SessionStorage) -> Self {
        match storage.get(COLLECTIONS_STORAGE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse stored collections: {}", e);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to read stored collections: {}", e);
                Self::default()
            }
        }
    }

    pub fn persist(&self, storage: &dyn SessionStorage) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        storage.set(COLLECTIONS_STORAGE_KEY, &json)
    }

    fn adjust_count(&mut self, collection_id: &str, added: bool) {
        if let Some(collection) = self.collections.iter_mut().find(|c| c.id == collection_id) {
            collection.resource_count = if added {
                collection.resource_count + 1
            } else {
                collection.resource_count.saturating_sub(1)
            };
            collection.updated_at = Utc::now();
        }
    }

    fn push_saved(&mut self, resource: &Resource, collection_id: &str) -> &SavedResource {
        let saved = SavedResource {
            id: format!("saved-{}", self.next_id()),
            resource_id: resource.id.clone(),
            collection_id: collection_id.to_string(),
            saved_at: Utc::now(),
            user_id: MOCK_USER_ID.to_string(),
            resource: ResourceSnapshot::from(resource),
        };
        let index = self.saved_resources.len();
        self.saved_resources.push(saved);
        &self.saved_resources[index]
    }

    /// Millisecond timestamp, bumped when two ids land in the same millisecond
    fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_id = if now > self.last_id { now } else { self.last_id + 1 };
        self.last_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::state::storage::MemoryStorage;

    fn resource(id: &str) -> Resource {
        fixtures::search_results()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap()
    }

    #[test]
    fn test_toggle_creates_quick_collection() {
        let mut store = CollectionStore::new();
        let paper = resource("1");

        assert_eq!(store.toggle_save(&paper), SaveOutcome::Saved);
        assert_eq!(store.collections().len(), 1);
        assert_eq!(store.collections()[0].id, QUICK_COLLECTION_ID);
        assert_eq!(store.collections()[0].name, "Saved");
        assert!(store.is_saved("1"));

        let saved = &store.saved_resources()[0];
        assert!(saved.id.starts_with("saved-"));
        assert_eq!(saved.resource.title, paper.title);
        assert_eq!(saved.user_id, MOCK_USER_ID);

        assert_eq!(store.collections()[0].resource_count, 1);

        assert_eq!(store.toggle_save(&paper), SaveOutcome::Removed);
        assert!(!store.is_saved("1"));
        assert_eq!(store.collections().len(), 1);
        assert_eq!(store.collections()[0].resource_count, 0);
    }

    #[test]
    fn test_unsave_decrements_every_holding_collection() {
        let mut store = CollectionStore::new();
        store.load_collections();
        let thesis = store.create_collection("Thesis", None, false).id.clone();
        let paper = resource("3");

        store.save_to_collection(&paper, &thesis).unwrap();
        store.save_to_collection(&paper, "collection-2").unwrap();
        assert_eq!(store.collection("collection-2").unwrap().resource_count, 13);

        assert_eq!(store.toggle_save(&paper), SaveOutcome::Removed);
        assert_eq!(store.collection(&thesis).unwrap().resource_count, 0);
        assert_eq!(store.collection("collection-2").unwrap().resource_count, 12);
        assert_eq!(store.collection("collection-1").unwrap().resource_count, 5);
    }

    #[test]
    fn test_toggle_uses_first_existing_collection() {
        let mut store = CollectionStore::new();
        store.load_collections();
        store.toggle_save(&resource("2"));

        assert_eq!(store.saved_in("collection-1").len(), 1);
        assert!(store.saved_in("collection-2").is_empty());
    }

    #[test]
    fn test_seeded_collections() {
        let mut store = CollectionStore::new();
        store.load_collections();

        let ml = store.collection("collection-2").unwrap();
        assert!(ml.is_public);
        assert_eq!(ml.resource_count, 12);
        assert!(ml.created_at < store.collection("collection-1").unwrap().created_at);
    }

    #[test]
    fn test_save_to_collection() {
        let mut store = CollectionStore::new();
        let id = store
            .create_collection("Thesis", Some("Chapter 2"), false)
            .id
            .clone();
        assert!(id.starts_with("collection-"));

        let paper = resource("3");
        store.save_to_collection(&paper, &id).unwrap();
        assert_eq!(store.collection(&id).unwrap().resource_count, 1);

        assert_eq!(
            store.save_to_collection(&paper, &id).unwrap_err(),
            CollectionError::AlreadySaved {
                resource_id: "3".to_string(),
                collection_id: id.clone(),
            }
        );
        assert!(matches!(
            store.save_to_collection(&paper, "missing"),
            Err(CollectionError::UnknownCollection(_))
        ));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = CollectionStore::new();
        let a = store.create_collection("A", None, false).id.clone();
        let b = store.create_collection("B", None, false).id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_persist_and_restore() {
        let storage = MemoryStorage::new();
        let mut store = CollectionStore::new();
        store.toggle_save(&resource("1"));
        store.persist(&storage).unwrap();

        let restored = CollectionStore::restore(&storage);
        assert!(restored.is_saved("1"));
        assert_eq!(restored.collections().len(), 1);

        storage.set(COLLECTIONS_STORAGE_KEY, "{broken").unwrap();
        assert_eq!(CollectionStore::restore(&storage), CollectionStore::new());
    }
}
