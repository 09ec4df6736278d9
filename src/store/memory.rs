// src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, category_in_use, missing_category};
use crate::{
    error::AppError,
    models::{
        avatar::{Avatar, AvatarInput},
        category::{Category, CategoryInput},
        question::{NewQuestion, Question, QuestionUpdate, QuestionWithCategory},
    },
};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    avatars: BTreeMap<i64, Avatar>,
    questions: BTreeMap<i64, Question>,
    last_category_id: i64,
    last_avatar_id: i64,
    last_question_id: i64,
}

impl Tables {
    fn join(&self, question: &Question) -> Result<QuestionWithCategory, AppError> {
        let category = self
            .categories
            .get(&question.category_id)
            .cloned()
            .ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "question {} references missing category {}",
                    question.id, question.category_id
                ))
            })?;
        Ok(QuestionWithCategory {
            question: question.clone(),
            category,
        })
    }
}

/// `Store` kept in process memory. Enforces the same ordering and reference rules as
/// the Postgres schema; contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_category_id += 1;
        let category = Category {
            id: tables.last_category_id,
            name: input.name.clone(),
            image: input.image.clone(),
            created_at: Utc::now(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn latest_category(&self) -> Result<Option<Category>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn update_category(
        &self,
        id: i64,
        input: &CategoryInput,
    ) -> Result<Category, AppError> {
        let mut tables = self.tables.write().await;
        let category = tables
            .categories
            .get_mut(&id)
            .ok_or(AppError::NotFound("Category not found".to_string()))?;
        category.name = input.name.clone();
        category.image = input.image.clone();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
        if tables.questions.values().any(|q| q.category_id == id) {
            return Err(category_in_use());
        }
        tables.categories.remove(&id);
        Ok(())
    }

    async fn create_avatar(&self, input: &AvatarInput) -> Result<Avatar, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_avatar_id += 1;
        let avatar = Avatar {
            id: tables.last_avatar_id,
            url: input.url.clone(),
            created_at: Utc::now(),
        };
        tables.avatars.insert(avatar.id, avatar.clone());
        Ok(avatar)
    }

    async fn list_avatars(&self) -> Result<Vec<Avatar>, AppError> {
        // BTreeMap iterates in ascending id order.
        Ok(self.tables.read().await.avatars.values().cloned().collect())
    }

    async fn get_avatar(&self, id: i64) -> Result<Option<Avatar>, AppError> {
        Ok(self.tables.read().await.avatars.get(&id).cloned())
    }

    async fn update_avatar(&self, id: i64, input: &AvatarInput) -> Result<Avatar, AppError> {
        let mut tables = self.tables.write().await;
        let avatar = tables
            .avatars
            .get_mut(&id)
            .ok_or(AppError::NotFound("Avatar not found".to_string()))?;
        avatar.url = input.url.clone();
        Ok(avatar.clone())
    }

    async fn delete_avatar(&self, id: i64) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .avatars
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound("Avatar not found".to_string()))
    }

    async fn create_question(&self, input: &NewQuestion) -> Result<Question, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&input.category_id) {
            return Err(missing_category(input.category_id));
        }
        tables.last_question_id += 1;
        let question = Question {
            id: tables.last_question_id,
            question: input.question.clone(),
            option_a: input.option_a.clone(),
            option_b: input.option_b.clone(),
            option_c: input.option_c.clone(),
            option_d: input.option_d.clone(),
            correct_answer: input.correct_answer,
            difficulty: input.difficulty,
            category_id: input.category_id,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn list_questions(&self) -> Result<Vec<QuestionWithCategory>, AppError> {
        let tables = self.tables.read().await;
        let mut questions = tables
            .questions
            .values()
            .map(|q| tables.join(q))
            .collect::<Result<Vec<_>, _>>()?;
        questions.sort_by(|a, b| {
            b.question
                .created_at
                .cmp(&a.question.created_at)
                .then(b.question.id.cmp(&a.question.id))
        });
        Ok(questions)
    }

    async fn get_question(&self, id: i64) -> Result<Option<QuestionWithCategory>, AppError> {
        let tables = self.tables.read().await;
        tables.questions.get(&id).map(|q| tables.join(q)).transpose()
    }

    async fn update_question(
        &self,
        id: i64,
        input: &QuestionUpdate,
    ) -> Result<Question, AppError> {
        let fields = &input.fields;
        let mut tables = self.tables.write().await;
        if !tables.questions.contains_key(&id) {
            return Err(AppError::NotFound("Question not found".to_string()));
        }
        if !tables.categories.contains_key(&fields.category_id) {
            return Err(missing_category(fields.category_id));
        }
        let question = tables
            .questions
            .get_mut(&id)
            .ok_or(AppError::NotFound("Question not found".to_string()))?;
        question.question = fields.question.clone();
        question.option_a = fields.option_a.clone();
        question.option_b = fields.option_b.clone();
        question.option_c = fields.option_c.clone();
        question.option_d = fields.option_d.clone();
        question.correct_answer = fields.correct_answer;
        question.difficulty = fields.difficulty;
        question.category_id = fields.category_id;
        question.is_active = input.is_active;
        Ok(question.clone())
    }

    async fn delete_question(&self, id: i64) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .questions
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound("Question not found".to_string()))
    }
}
