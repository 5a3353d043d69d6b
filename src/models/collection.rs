//! Collections of saved resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceType};

/// A user-scoped grouping of saved resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resource_count: u32,
    pub user_id: String,
}

impl Collection {
    /// Create an empty collection owned by `user_id`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        is_public: bool,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            is_public,
            created_at: now,
            updated_at: now,
            resource_count: 0,
            user_id: user_id.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Fields of a resource copied at save time
///
/// There is no link back to the live catalog; later catalog edits do not
/// reach saved entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl From<&Resource> for ResourceSnapshot {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            title: resource.title.clone(),
            authors: resource.authors.clone(),
            resource_type: resource.resource_type,
            year: resource.year,
            journal: resource.journal.clone(),
            publisher: resource.publisher.clone(),
        }
    }
}

/// Membership of a resource in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResource {
    pub id: String,
    pub resource_id: String,
    pub collection_id: String,
    pub saved_at: DateTime<Utc>,
    pub user_id: String,
    pub resource: ResourceSnapshot,
}
