//! Mock authentication persisted in session storage.

use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use super::storage::SessionStorage;
use crate::models::{Role, User};

/// Storage key holding the serialized signed-in user
pub const USER_STORAGE_KEY: &str = "discovery-ui-user";

/// Id given to every mock user
pub const MOCK_USER_ID: &str = "1";

const MOCK_USER_NAME: &str = "John Doe";
const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"\S+@\S+\.\S+").ok())
        .as_ref()
}

/// Per-field validation messages of the sign-in and sign-up forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }

    /// Messages in form order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        [&self.name, &self.email, &self.password]
            .into_iter()
            .filter_map(|message| message.as_deref())
    }
}

/// Validate sign-in credentials
pub fn validate_credentials(email: &str, password: &str) -> FormErrors {
    let email_error = if email.trim().is_empty() {
        Some("Email is required".to_string())
    } else if !email_pattern().is_some_and(|re| re.is_match(email)) {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    };

    let password_error = if password.is_empty() {
        Some("Password is required".to_string())
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Some(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ))
    } else {
        None
    };

    FormErrors {
        name: None,
        email: email_error,
        password: password_error,
    }
}

/// Validate sign-up details
pub fn validate_sign_up(name: &str, email: &str, password: &str) -> FormErrors {
    FormErrors {
        name: name.trim().is_empty().then(|| "Name is required".to_string()),
        ..validate_credentials(email, password)
    }
}

/// Avatar image generated from the email address
pub fn avatar_url(email: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", email)
}

fn mock_user(name: &str, email: &str) -> User {
    User {
        id: MOCK_USER_ID.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: Some(avatar_url(email)),
        role: Role::User,
        created_at: Utc::now(),
    }
}

/// Signed-in user state
///
/// Failures never propagate out of the store; they are kept in
/// [`AuthStore::error`] or [`AuthStore::form_errors`] for display.
#[derive(Debug)]
pub struct AuthStore {
    storage: Arc<dyn SessionStorage>,
    user: Option<User>,
    error: Option<String>,
    form_errors: FormErrors,
}

impl AuthStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            user: None,
            error: None,
            form_errors: FormErrors::default(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form_errors(&self) -> &FormErrors {
        &self.form_errors
    }

    /// Restore the user saved by an earlier session. A stored value that no
    /// longer parses is removed.
    pub fn initialize(&mut self) {
        let stored = match self.storage.get(USER_STORAGE_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Failed to read stored user: {}", e);
                return;
            }
        };
        let Some(stored) = stored else {
            return;
        };

        match serde_json::from_str::<User>(&stored) {
            Ok(user) => {
                tracing::debug!("Restored session for {}", user.email);
                self.user = Some(user);
            }
            Err(e) => {
                tracing::warn!("Failed to parse stored user: {}", e);
                if let Err(e) = self.storage.remove(USER_STORAGE_KEY) {
                    tracing::warn!("Failed to remove stored user: {}", e);
                }
            }
        }
    }

    /// Sign in with any well-formed credentials. Returns whether a user is
    /// now signed in.
    pub fn sign_in(&mut self, email: &str, password: &str) -> bool {
        self.form_errors = validate_credentials(email, password);
        if !self.form_errors.is_empty() {
            return false;
        }
        self.establish(mock_user(MOCK_USER_NAME, email), "Login failed")
    }

    /// Create an account and sign it in
    pub fn sign_up(&mut self, name: &str, email: &str, password: &str) -> bool {
        self.form_errors = validate_sign_up(name, email, password);
        if !self.form_errors.is_empty() {
            return false;
        }
        self.establish(mock_user(name.trim(), email), "Signup failed")
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("Signed out {}", user.email);
        }
        if let Err(e) = self.storage.remove(USER_STORAGE_KEY) {
            tracing::warn!("Failed to clear stored user: {}", e);
        }
    }

    fn establish(&mut self, user: User, failure: &str) -> bool {
        self.error = None;
        let persisted = serde_json::to_string(&user)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .set(USER_STORAGE_KEY, &json)
                    .map_err(|e| e.to_string())
            });

        tracing::info!("Signed in {}", user.email);
        self.user = Some(user);

        if let Err(e) = persisted {
            tracing::warn!("{}: {}", failure, e);
            self.error = Some(format!("{}: {}", failure, e));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn store() -> (Arc<MemoryStorage>, AuthStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), AuthStore::new(storage))
    }

    #[test]
    fn test_validation_messages() {
        let errors = validate_credentials("", "");
        assert_eq!(errors.email.as_deref(), Some("Email is required"));
        assert_eq!(errors.password.as_deref(), Some("Password is required"));

        let errors = validate_credentials("not-an-email", "12345");
        assert_eq!(
            errors.email.as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 6 characters")
        );

        assert!(validate_credentials("ada@example.com", "secret").is_empty());
        assert_eq!(
            validate_sign_up(" ", "ada@example.com", "secret").messages().collect::<Vec<_>>(),
            vec!["Name is required"]
        );
    }

    #[test]
    fn test_sign_in_persists_mock_user() {
        let (storage, mut auth) = store();
        assert!(auth.sign_in("ada@example.com", "secret"));

        let user = auth.user().unwrap();
        assert_eq!(user.id, MOCK_USER_ID);
        assert_eq!(user.name, "John Doe");
        assert_eq!(
            user.avatar.as_deref(),
            Some("https://api.dicebear.com/7.x/avataaars/svg?seed=ada@example.com")
        );
        assert!(storage.get(USER_STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_invalid_sign_in_keeps_signed_out() {
        let (storage, mut auth) = store();
        assert!(!auth.sign_in("ada", ""));
        assert!(!auth.is_authenticated());
        assert!(!auth.form_errors().is_empty());
        assert_eq!(storage.get(USER_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_session_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut auth = AuthStore::new(Arc::new(FileStorage::new(&path)));
        assert!(auth.sign_up("Grace Hopper", "grace@example.com", "cobol!"));

        let mut restored = AuthStore::new(Arc::new(FileStorage::new(&path)));
        restored.initialize();
        assert_eq!(restored.user().unwrap().name, "Grace Hopper");

        restored.sign_out();
        let mut after = AuthStore::new(Arc::new(FileStorage::new(&path)));
        after.initialize();
        assert!(!after.is_authenticated());
    }

    #[test]
    fn test_corrupt_stored_user_is_removed() {
        let (storage, mut auth) = store();
        storage.set(USER_STORAGE_KEY, "{broken").unwrap();

        auth.initialize();
        assert!(!auth.is_authenticated());
        assert_eq!(storage.get(USER_STORAGE_KEY).unwrap(), None);
    }
}
