use serde::{Deserialize, Serialize};

use crate::ids;

/// Authenticated user as returned by the login endpoint.
///
/// The backend reports `id` as a number on some deployments and a string on
/// others, so it is normalized to a string at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

impl User {
    /// Display name used by UI collaborators: name, else the email local part.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}
