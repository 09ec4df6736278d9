// src/models/question.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppError, models::category::Category};

/// Option slot holding the correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerOption::A => "A",
            AnswerOption::B => "B",
            AnswerOption::C => "C",
            AnswerOption::D => "D",
        }
    }
}

impl FromStr for AnswerOption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AnswerOption::A),
            "B" => Ok(AnswerOption::B),
            "C" => Ok(AnswerOption::C),
            "D" => Ok(AnswerOption::D),
            other => Err(AppError::InternalServerError(format!(
                "unknown answer option '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            other => Err(AppError::InternalServerError(format!(
                "unknown difficulty '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quiz question with four options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub difficulty: Difficulty,
    pub category_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A question joined with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionWithCategory {
    #[serde(flatten)]
    pub question: Question,
    pub category: Category,
}

/// Raw 'questions' row. Enum columns are stored as TEXT.
#[derive(Debug, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub difficulty: String,
    pub category_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            question: row.question,
            option_a: row.option_a,
            option_b: row.option_b,
            option_c: row.option_c,
            option_d: row.option_d,
            correct_answer: row.correct_answer.parse()?,
            difficulty: row.difficulty.parse()?,
            category_id: row.category_id,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// 'questions' row joined with its category columns (prefixed `category_`).
#[derive(Debug, FromRow)]
pub struct QuestionWithCategoryRow {
    #[sqlx(flatten)]
    pub question: QuestionRow,
    pub category_name: String,
    pub category_image: Option<String>,
    pub category_created_at: DateTime<Utc>,
}

impl TryFrom<QuestionWithCategoryRow> for QuestionWithCategory {
    type Error = AppError;

    fn try_from(row: QuestionWithCategoryRow) -> Result<Self, Self::Error> {
        let question = Question::try_from(row.question)?;
        let category = Category {
            id: question.category_id,
            name: row.category_name,
            image: row.category_image,
            created_at: row.category_created_at,
        };
        Ok(QuestionWithCategory { question, category })
    }
}

/// DTO for creating a new question.
///
/// Every option is mandatory, so any `correctAnswer` letter names a populated option.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    #[validate(length(min = 1, message = "Option A is required"))]
    pub option_a: String,
    #[validate(length(min = 1, message = "Option B is required"))]
    pub option_b: String,
    #[validate(length(min = 1, message = "Option C is required"))]
    pub option_c: String,
    #[validate(length(min = 1, message = "Option D is required"))]
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub difficulty: Difficulty,
    pub category_id: i64,
}

/// DTO for replacing a question. All fields are required, including `isActive`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: NewQuestion,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionStats {
    pub total: usize,
    pub active: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl QuestionStats {
    pub fn from_questions(questions: &[QuestionWithCategory]) -> Self {
        let count = |level: Difficulty| {
            questions
                .iter()
                .filter(|q| q.question.difficulty == level)
                .count()
        };

        Self {
            total: questions.len(),
            active: questions.iter().filter(|q| q.question.is_active).count(),
            easy: count(Difficulty::Easy),
            medium: count(Difficulty::Medium),
            hard: count(Difficulty::Hard),
        }
    }
}
