// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, category_in_use, missing_category};
use crate::{
    error::AppError,
    models::{
        avatar::{Avatar, AvatarInput},
        category::{Category, CategoryInput},
        question::{
            NewQuestion, Question, QuestionRow, QuestionUpdate, QuestionWithCategory,
            QuestionWithCategoryRow,
        },
    },
};

const CATEGORY_COLUMNS: &str = "id, name, image, created_at";
const AVATAR_COLUMNS: &str = "id, url, created_at";
const QUESTION_COLUMNS: &str = "id, question, option_a, option_b, option_c, option_d, \
     correct_answer, difficulty, category_id, is_active, created_at";
const JOINED_QUESTION_SELECT: &str = r#"
    SELECT
        q.id, q.question, q.option_a, q.option_b, q.option_c, q.option_d,
        q.correct_answer, q.difficulty, q.category_id, q.is_active, q.created_at,
        c.name AS category_name,
        c.image AS category_image,
        c.created_at AS category_created_at
    FROM questions q
    JOIN categories c ON c.id = q.category_id
"#;

/// `Store` backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

/// Logs and wraps an unexpected database error.
fn db_failure(action: &str, err: sqlx::Error) -> AppError {
    tracing::error!("Failed to {}: {:?}", action, err);
    AppError::InternalServerError(err.to_string())
}

#[async_trait]
impl Store for PgStore {
    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError> {
        let sql = format!(
            "INSERT INTO categories (name, image) VALUES ($1, $2) RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(&input.name)
            .bind(&input.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_failure("create category", e))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let sql = format!(
            r#"SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name COLLATE "C" ASC, id ASC"#
        );
        sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_failure("list categories", e))
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn latest_category(&self) -> Result<Option<Category>, AppError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        Ok(sqlx::query_as::<_, Category>(&sql)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_category(
        &self,
        id: i64,
        input: &CategoryInput,
    ) -> Result<Category, AppError> {
        let sql = format!(
            "UPDATE categories SET name = $1, image = $2 WHERE id = $3 RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(&input.name)
            .bind(&input.image)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_failure("update category", e))?
            .ok_or(AppError::NotFound("Category not found".to_string()))
    }

    async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    category_in_use()
                } else {
                    db_failure("delete category", e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }

    async fn create_avatar(&self, input: &AvatarInput) -> Result<Avatar, AppError> {
        let sql = format!("INSERT INTO avatars (url) VALUES ($1) RETURNING {AVATAR_COLUMNS}");
        sqlx::query_as::<_, Avatar>(&sql)
            .bind(&input.url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_failure("create avatar", e))
    }

    async fn list_avatars(&self) -> Result<Vec<Avatar>, AppError> {
        let sql = format!("SELECT {AVATAR_COLUMNS} FROM avatars ORDER BY id ASC");
        sqlx::query_as::<_, Avatar>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_failure("list avatars", e))
    }

    async fn get_avatar(&self, id: i64) -> Result<Option<Avatar>, AppError> {
        let sql = format!("SELECT {AVATAR_COLUMNS} FROM avatars WHERE id = $1");
        Ok(sqlx::query_as::<_, Avatar>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_avatar(&self, id: i64, input: &AvatarInput) -> Result<Avatar, AppError> {
        let sql = format!("UPDATE avatars SET url = $1 WHERE id = $2 RETURNING {AVATAR_COLUMNS}");
        sqlx::query_as::<_, Avatar>(&sql)
            .bind(&input.url)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_failure("update avatar", e))?
            .ok_or(AppError::NotFound("Avatar not found".to_string()))
    }

    async fn delete_avatar(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM avatars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_failure("delete avatar", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Avatar not found".to_string()));
        }
        Ok(())
    }

    async fn create_question(&self, input: &NewQuestion) -> Result<Question, AppError> {
        let sql = format!(
            r#"
            INSERT INTO questions
            (question, option_a, option_b, option_c, option_d, correct_answer, difficulty, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {QUESTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, QuestionRow>(&sql)
            .bind(&input.question)
            .bind(&input.option_a)
            .bind(&input.option_b)
            .bind(&input.option_c)
            .bind(&input.option_d)
            .bind(input.correct_answer.as_str())
            .bind(input.difficulty.as_str())
            .bind(input.category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    missing_category(input.category_id)
                } else {
                    db_failure("create question", e)
                }
            })?;

        Question::try_from(row)
    }

    async fn list_questions(&self) -> Result<Vec<QuestionWithCategory>, AppError> {
        let sql = format!("{JOINED_QUESTION_SELECT} ORDER BY q.created_at DESC, q.id DESC");
        sqlx::query_as::<_, QuestionWithCategoryRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_failure("list questions", e))?
            .into_iter()
            .map(QuestionWithCategory::try_from)
            .collect()
    }

    async fn get_question(&self, id: i64) -> Result<Option<QuestionWithCategory>, AppError> {
        let sql = format!("{JOINED_QUESTION_SELECT} WHERE q.id = $1");
        sqlx::query_as::<_, QuestionWithCategoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(QuestionWithCategory::try_from)
            .transpose()
    }

    async fn update_question(
        &self,
        id: i64,
        input: &QuestionUpdate,
    ) -> Result<Question, AppError> {
        let fields = &input.fields;
        let sql = format!(
            r#"
            UPDATE questions SET
                question = $1, option_a = $2, option_b = $3, option_c = $4, option_d = $5,
                correct_answer = $6, difficulty = $7, category_id = $8, is_active = $9
            WHERE id = $10
            RETURNING {QUESTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, QuestionRow>(&sql)
            .bind(&fields.question)
            .bind(&fields.option_a)
            .bind(&fields.option_b)
            .bind(&fields.option_c)
            .bind(&fields.option_d)
            .bind(fields.correct_answer.as_str())
            .bind(fields.difficulty.as_str())
            .bind(fields.category_id)
            .bind(input.is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    missing_category(fields.category_id)
                } else {
                    db_failure("update question", e)
                }
            })?
            .ok_or(AppError::NotFound("Question not found".to_string()))?;

        Question::try_from(row)
    }

    async fn delete_question(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_failure("delete question", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Question not found".to_string()));
        }
        Ok(())
    }
}
