//! Comment (post-booking feedback) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Comment joined with its author's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

/// Create comment request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(custom(function = "super::not_blank", message = "Comment text must not be blank"))]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comment_rejected() {
        let comment = CreateComment {
            text: " ".to_string(),
        };
        assert!(comment.validate().is_err());
    }

    #[test]
    fn test_comment_json() {
        let comment = Comment {
            id: 1,
            text: "Works great".to_string(),
            item_id: 7,
            author_id: 2,
            author_name: "Boris".to_string(),
            created: Utc::now(),
        };
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["authorName"], "Boris");
        assert_eq!(json["itemId"], 7);
    }
}
