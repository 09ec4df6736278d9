// src/store/mod.rs

//! Persistence seam. Handlers only talk to `dyn Store`; the Postgres pool backs it in
//! production and `MemoryStore` backs local runs without a database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        avatar::{Avatar, AvatarInput},
        category::{Category, CategoryInput},
        question::{NewQuestion, Question, QuestionUpdate, QuestionWithCategory},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// CRUD operations for every resource.
///
/// Lookups return `Ok(None)` for a missing id; `update_*` and `delete_*` report a
/// missing id as `AppError::NotFound`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError>;
    /// Sorted by name ascending, comparing bytes (so `Z` sorts before `a`), then by id.
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError>;
    async fn latest_category(&self) -> Result<Option<Category>, AppError>;
    async fn update_category(&self, id: i64, input: &CategoryInput)
    -> Result<Category, AppError>;
    /// Fails with `AppError::Conflict` while questions reference the category.
    async fn delete_category(&self, id: i64) -> Result<(), AppError>;

    async fn create_avatar(&self, input: &AvatarInput) -> Result<Avatar, AppError>;
    /// Sorted by id ascending.
    async fn list_avatars(&self) -> Result<Vec<Avatar>, AppError>;
    async fn get_avatar(&self, id: i64) -> Result<Option<Avatar>, AppError>;
    async fn update_avatar(&self, id: i64, input: &AvatarInput) -> Result<Avatar, AppError>;
    async fn delete_avatar(&self, id: i64) -> Result<(), AppError>;

    /// Fails with `AppError::BadRequest` when the category does not exist.
    async fn create_question(&self, input: &NewQuestion) -> Result<Question, AppError>;
    /// Newest first.
    async fn list_questions(&self) -> Result<Vec<QuestionWithCategory>, AppError>;
    async fn get_question(&self, id: i64) -> Result<Option<QuestionWithCategory>, AppError>;
    async fn update_question(&self, id: i64, input: &QuestionUpdate)
    -> Result<Question, AppError>;
    async fn delete_question(&self, id: i64) -> Result<(), AppError>;
}

pub(crate) fn missing_category(id: i64) -> AppError {
    AppError::BadRequest(format!("Category {} does not exist", id))
}

pub(crate) fn category_in_use() -> AppError {
    AppError::Conflict("Category is still referenced by questions".to_string())
}
