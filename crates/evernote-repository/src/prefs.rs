//! User preferences persisted by the host.
//!
//! The host scopes preferences to the current user; this module only names
//! the keys and provides an in-memory store for tests and tooling.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

/// Prefix of every preference written by the repository.
pub const SETTING_PREFIX: &str = "repository_evernote_";

/// Prefix used before version 2013090600.
pub const LEGACY_SETTING_PREFIX: &str = "evernote_";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to write preference {name}: {message}")]
    Write { name: String, message: String },
}

/// The preferences the repository reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    AccessToken,
    NoteStoreUrl,
    UserId,
    TokenSecret,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 4] = [
        PreferenceKey::TokenSecret,
        PreferenceKey::AccessToken,
        PreferenceKey::NoteStoreUrl,
        PreferenceKey::UserId,
    ];

    /// Unprefixed key
    pub fn suffix(self) -> &'static str {
        match self {
            PreferenceKey::AccessToken => "accesstoken",
            PreferenceKey::NoteStoreUrl => "notestoreurl",
            PreferenceKey::UserId => "userid",
            PreferenceKey::TokenSecret => "tokensecret",
        }
    }

    /// Full preference name as stored by the host.
    pub fn name(self) -> String {
        format!("{}{}", SETTING_PREFIX, self.suffix())
    }

    /// Name the preference had under the legacy prefix.
    pub fn legacy_name(self) -> String {
        format!("{}{}", LEGACY_SETTING_PREFIX, self.suffix())
    }
}

/// Key-value preferences of the current user.
pub trait Preferences: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str) -> Result<(), PreferenceError>;

    fn remove(&self, name: &str) -> Result<(), PreferenceError>;

    /// Read a repository preference, treating an empty value as unset.
    fn get_key(&self, key: PreferenceKey) -> Option<String> {
        self.get(&key.name()).filter(|value| !value.is_empty())
    }

    fn set_key(&self, key: PreferenceKey, value: &str) -> Result<(), PreferenceError> {
        self.set(&key.name(), value)
    }

    /// Move a value to a new name. Missing values are left alone.
    fn rename(&self, from: &str, to: &str) -> Result<(), PreferenceError> {
        if let Some(value) = self.get(from) {
            self.set(to, &value)?;
            self.remove(from)?;
        }
        Ok(())
    }
}

/// In-memory preferences for testing
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with name/value pairs
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: RwLock::new(map),
        }
    }

    fn lock_error(name: &str) -> PreferenceError {
        PreferenceError::Write {
            name: name.to_string(),
            message: "preference store lock poisoned".to_string(),
        }
    }
}

impl Preferences for InMemoryPreferences {
    fn get(&self, name: &str) -> Option<String> {
        self.values.read().ok()?.get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.write().map_err(|_| Self::lock_error(name))?;
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.write().map_err(|_| Self::lock_error(name))?;
        values.remove(name);
        Ok(())
    }
}
