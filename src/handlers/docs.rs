// src/handlers/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::{
    handlers::{avatar, category, question},
    models::{
        avatar::{Avatar, AvatarInput, AvatarStats},
        category::{Category, CategoryInput, CategoryStats},
        question::{
            AnswerOption, Difficulty, NewQuestion, Question, QuestionStats, QuestionUpdate,
            QuestionWithCategory,
        },
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Q&A admin API"),
    paths(
        category::list_categories,
        category::create_category,
        category::get_category,
        category::latest_category,
        category::update_category,
        category::delete_category,
        category::category_stats,
        avatar::list_avatars,
        avatar::create_avatar,
        avatar::get_avatar,
        avatar::update_avatar,
        avatar::delete_avatar,
        avatar::avatar_stats,
        question::list_questions,
        question::create_question,
        question::get_question,
        question::update_question,
        question::delete_question,
        question::question_stats,
    ),
    components(schemas(
        Category,
        CategoryInput,
        CategoryStats,
        Avatar,
        AvatarInput,
        AvatarStats,
        AnswerOption,
        Difficulty,
        Question,
        QuestionWithCategory,
        NewQuestion,
        QuestionUpdate,
        QuestionStats,
    )),
    tags(
        (name = "categories", description = "Question categories"),
        (name = "avatars", description = "Avatar images offered to users"),
        (name = "questions", description = "Quiz questions")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
