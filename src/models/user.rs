//! Authenticated user model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A signed-in user as persisted in session storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Initials used in place of a missing avatar
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_round_trips_camel_case() {
        let json = r#"{"id":"1","name":"Ada Lovelace","email":"ada@example.com","role":"admin","createdAt":"2024-01-02T03:04:05Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.avatar, None);
        assert_eq!(user.initials(), "AL");
    }
}
