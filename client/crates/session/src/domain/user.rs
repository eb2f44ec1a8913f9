//! User Entity
//!
//! The backend-verified identity held in session state. Roles arrive in
//! two wire forms depending on the endpoint: a single scalar `role` field
//! or an `authorities` collection. Role checks honor both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role name granting every override
pub const ROLE_ADMIN: &str = "ADMIN";

/// Role name granting moderation overrides
pub const ROLE_MODERATOR: &str = "MODERADOR";

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier, compared against resource ownership fields
    pub id: i64,
    /// User name (unique, for login and display)
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Role as a single scalar field
    #[serde(default)]
    pub role: Option<String>,
    /// Role collection
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user carries the given role
    ///
    /// True if the scalar role field equals `role` or the authorities
    /// collection contains it.
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role) || self.authorities.iter().any(|a| a == role)
    }

    /// Derived per call, never cached
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Derived per call, never cached
    pub fn is_moderator(&self) -> bool {
        self.has_role(ROLE_MODERATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: Option<&str>, authorities: &[&str]) -> User {
        User {
            id: 1,
            username: "ada".to_string(),
            email: None,
            display_name: None,
            role: role.map(String::from),
            authorities: authorities.iter().map(|s| s.to_string()).collect(),
            created_at: None,
        }
    }

    #[test]
    fn test_has_role_scalar_form() {
        let user = user_with(Some(ROLE_ADMIN), &[]);
        assert!(user.has_role(ROLE_ADMIN));
        assert!(!user.has_role(ROLE_MODERATOR));
    }

    #[test]
    fn test_has_role_collection_form() {
        let user = user_with(None, &[ROLE_MODERATOR]);
        assert!(user.has_role(ROLE_MODERATOR));
        assert!(!user.has_role(ROLE_ADMIN));
        assert!(user.is_moderator());
    }

    #[test]
    fn test_has_role_both_forms() {
        let user = user_with(Some(ROLE_ADMIN), &[ROLE_MODERATOR]);
        assert!(user.has_role(ROLE_ADMIN));
        assert!(user.has_role(ROLE_MODERATOR));
    }

    #[test]
    fn test_has_role_without_roles() {
        let user = user_with(None, &[]);
        assert!(!user.has_role(ROLE_ADMIN));
        assert!(!user.is_admin());
        assert!(!user.is_moderator());
    }

    #[test]
    fn test_role_names_are_exact_matches() {
        let user = user_with(Some("admin"), &["moderador"]);
        assert!(!user.is_admin());
        assert!(!user.is_moderator());
    }

    #[test]
    fn test_wire_format_camel_case() {
        let user: User = serde_json::from_str(
            r#"{"id":7,"username":"grace","displayName":"Grace","authorities":["MODERADOR"]}"#,
        )
        .unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.display_name.as_deref(), Some("Grace"));
        assert!(user.is_moderator());
        assert!(user.role.is_none());
    }
}
