// src/models/avatar.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::is_valid_url;

/// Represents the 'avatars' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub id: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Body for both creating and updating an avatar.
/// Unknown fields (older clients send a `name`) are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AvatarInput {
    #[validate(custom(function = validate_avatar_url))]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AvatarStats {
    pub total: usize,
}

impl AvatarStats {
    pub fn from_avatars(avatars: &[Avatar]) -> Self {
        Self {
            total: avatars.len(),
        }
    }
}

fn validate_avatar_url(url: &str) -> Result<(), ValidationError> {
    if is_valid_url(url) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_url").with_message("Invalid avatar URL".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_must_be_well_formed() {
        let ok = AvatarInput {
            url: "https://cdn.test/a.png".to_string(),
        };
        assert!(ok.validate().is_ok());

        for bad in ["", "avatar.png", "//missing-scheme"] {
            let input = AvatarInput {
                url: bad.to_string(),
            };
            let errors = input.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("url"), "{bad:?} accepted");
        }
    }

    #[test]
    fn stray_name_field_is_ignored() {
        let input: AvatarInput =
            serde_json::from_str(r#"{"name":"old","url":"https://cdn.test/a.png"}"#).unwrap();
        assert_eq!(input.url, "https://cdn.test/a.png");
    }
}
