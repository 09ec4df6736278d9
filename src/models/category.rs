// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::is_valid_url;

/// Represents the 'categories' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,

    pub name: String,

    /// Cover image URL. May be absent or an empty string.
    pub image: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Body for both creating and updating a category.
///
/// Updates are full overwrites: an omitted `image` clears the stored one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = validate_image_url))]
    pub image: Option<String>,
}

/// Naive counts over the full category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total: usize,
    pub with_image: usize,
}

impl CategoryStats {
    pub fn from_categories(categories: &[Category]) -> Self {
        let with_image = categories
            .iter()
            .filter(|c| c.image.as_deref().is_some_and(|img| !img.is_empty()))
            .count();

        Self {
            total: categories.len(),
            with_image,
        }
    }
}

/// An empty string is accepted and means "no image".
fn validate_image_url(image: &str) -> Result<(), ValidationError> {
    if image.is_empty() || is_valid_url(image) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_url").with_message("Invalid image URL".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, image: Option<&str>) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn empty_name_is_rejected_with_field_message() {
        let errors = input("", None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.to_string().contains("Name is required"));
    }

    #[test]
    fn image_may_be_missing_empty_or_url() {
        assert!(input("Prayer", None).validate().is_ok());
        assert!(input("Prayer", Some("")).validate().is_ok());
        assert!(input("Prayer", Some("https://x/img.png")).validate().is_ok());
    }

    #[test]
    fn malformed_image_is_rejected() {
        let errors = input("Prayer", Some("not a url")).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("image"));
        assert!(errors.to_string().contains("Invalid image URL"));
    }

    #[test]
    fn stats_count_only_non_empty_images() {
        let now = Utc::now();
        let make = |id, image: Option<&str>| Category {
            id,
            name: format!("c{id}"),
            image: image.map(str::to_string),
            created_at: now,
        };
        let categories = vec![
            make(1, None),
            make(2, Some("")),
            make(3, Some("https://x/a.png")),
        ];

        let stats = CategoryStats::from_categories(&categories);
        assert_eq!(stats, CategoryStats { total: 3, with_image: 1 });
    }
}
