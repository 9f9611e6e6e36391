//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumina_core::{Email, UserId, Username};

/// A storefront account (domain type).
///
/// Never carries the password hash; that stays inside the user repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Contact address, also used as the order email.
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Grants access to the `/api/admin` routes.
    pub is_admin: bool,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Trim an optional name, treating blank input as absent.
#[must_use]
pub fn clean_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_hides_nothing_sensitive() {
        let user = User {
            id: UserId::new(3),
            username: Username::parse("lamp_fan").unwrap(),
            email: Email::parse("fan@example.com").unwrap(),
            first_name: Some("Ada".to_owned()),
            last_name: None,
            is_admin: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["username"], "lamp_fan");
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_register_request_optional_names() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"ada","password":"longenough","email":"ada@example.com"}"#,
        )
        .unwrap();
        assert!(req.first_name.is_none());
        assert!(req.last_name.is_none());
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name(Some("  Ada ")), Some("Ada".to_owned()));
        assert_eq!(clean_name(Some("   ")), None);
        assert_eq!(clean_name(None), None);
    }
}
