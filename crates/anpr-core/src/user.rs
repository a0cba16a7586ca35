//! The authenticated user profile.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend user identifier.
///
/// The backend may send numeric or string ids; both are normalized to a
/// string so they can key locally persisted maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => UserId(n.to_string()),
            Raw::Str(s) => UserId(s),
        })
    }
}

/// User profile returned alongside the access-control tree.
///
/// Immutable for the lifetime of a session; replaced wholesale on re-login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let a: User = serde_json::from_str(r#"{"id": 7, "username": "op"}"#).unwrap();
        let b: User = serde_json::from_str(r#"{"id": "7", "username": "op"}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_str(), "7");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "username": "gate1", "name": "  "}"#).unwrap();
        assert_eq!(user.display_name(), "gate1");
    }
}
