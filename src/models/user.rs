//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "super::not_blank", message = "Name must not be blank"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Partial user update; absent or empty fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateUser {
    /// Apply the non-empty fields of this patch onto `user`
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            user.name = name;
        }
        if let Some(email) = self.email.filter(|e| !e.is_empty()) {
            user.email = email;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
        }
    }

    #[test]
    fn test_create_user_validation() {
        let ok = CreateUser {
            name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = CreateUser {
            name: "  ".to_string(),
            email: "anna@example.com".to_string(),
        };
        assert!(blank.validate().is_err());

        let bad_email = CreateUser {
            name: "Anna".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut u = user();
        UpdateUser {
            name: None,
            email: Some("new@example.com".to_string()),
        }
        .apply_to(&mut u);
        assert_eq!(u.name, "Anna");
        assert_eq!(u.email, "new@example.com");

        UpdateUser {
            name: Some(String::new()),
            email: None,
        }
        .apply_to(&mut u);
        assert_eq!(u.name, "Anna");
    }

    #[test]
    fn test_user_json_round_trip() {
        let json = serde_json::to_value(user()).unwrap();
        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user());
    }
}
