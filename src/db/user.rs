//! User model.
//!
//! Users are owned by the account side of the system; correspondences only
//! reference them by id and project them as [`UserPreview`].

use serde::Serialize;

/// User entity representing a registered account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// First name.
    pub first_name: String,
    /// Second (family) name.
    pub second_name: String,
    /// Email address (unique).
    pub email: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Reduced, client-facing representation of this user.
    pub fn preview(&self) -> UserPreview {
        UserPreview {
            id: self.id,
            first_name: self.first_name.clone(),
            second_name: self.second_name.clone(),
        }
    }
}

/// Reduced user projection used in member lists and message senders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UserPreview {
    /// User ID.
    pub id: i64,
    /// First name.
    pub first_name: String,
    /// Second (family) name.
    pub second_name: String,
}

impl From<&User> for UserPreview {
    fn from(user: &User) -> Self {
        user.preview()
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// First name.
    pub first_name: String,
    /// Second (family) name.
    pub second_name: String,
    /// Email address.
    pub email: String,
}

impl NewUser {
    /// Create a new user with all required fields.
    pub fn new(
        first_name: impl Into<String>,
        second_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            second_name: second_name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = NewUser::new("Ada", "Lovelace", "ada@example.com");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.second_name, "Lovelace");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_preview_drops_private_fields() {
        let user = User {
            id: 7,
            first_name: "Ada".to_string(),
            second_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
        };

        let preview = UserPreview::from(&user);
        assert_eq!(preview.id, 7);
        assert_eq!(preview.first_name, "Ada");

        let json = serde_json::to_value(&preview).unwrap();
        assert!(json.get("email").is_none());
    }
}
