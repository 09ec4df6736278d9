// src/handlers/question.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    cache::{ListCache, Resource},
    error::AppError,
    extract::{ApiPath, ApiQuery, ValidatedJson},
    models::question::{
        NewQuestion, Question, QuestionStats, QuestionUpdate, QuestionWithCategory,
    },
    state::Db,
    utils::{
        jwt::Claims,
        listing::{ListParams, filter_by, paginate},
    },
};

async fn cached_questions(
    store: &Db,
    cache: &ListCache,
    filter: &str,
) -> Result<Arc<Vec<QuestionWithCategory>>, AppError> {
    cache
        .get_or_load(Resource::Question, filter, move || async move {
            let questions = store.list_questions().await?;
            Ok(filter_by(questions, filter, |q| q.question.question.as_str()))
        })
        .await
}

/// Lists questions newest first, each with its category.
#[utoipa::path(
    get,
    path = "/api/questions",
    tag = "questions",
    params(ListParams),
    responses((status = 200, description = "Questions, newest first", body = [QuestionWithCategory]))
)]
pub async fn list_questions(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let questions = cached_questions(&store, &cache, &params.filter()).await?;
    Ok(Json(paginate(&questions, params.page, params.per_page)))
}

/// Creates a new quiz question. New questions start active.
#[utoipa::path(
    post,
    path = "/api/questions",
    tag = "questions",
    request_body = NewQuestion,
    responses(
        (status = 201, description = "Created", body = Question),
        (status = 400, description = "Validation failed or unknown category")
    )
)]
pub async fn create_question(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<NewQuestion>,
) -> Result<impl IntoResponse, AppError> {
    let question = store.create_question(&payload).await?;
    cache.invalidate(Resource::Question).await;
    tracing::info!(
        id = question.id,
        category_id = question.category_id,
        by = %claims.sub,
        "question created"
    );

    Ok((StatusCode::CREATED, Json(question)))
}

#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "Found", body = QuestionWithCategory),
        (status = 404, description = "No such question")
    )
)]
pub async fn get_question(
    State(store): State<Db>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = store
        .get_question(id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Replaces every field of a question, including `isActive`.
#[utoipa::path(
    put,
    path = "/api/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    request_body = QuestionUpdate,
    responses(
        (status = 200, description = "Updated", body = Question),
        (status = 400, description = "Validation failed or unknown category"),
        (status = 404, description = "No such question")
    )
)]
pub async fn update_question(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<QuestionUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let question = store.update_question(id, &payload).await?;
    cache.invalidate(Resource::Question).await;
    tracing::info!(id, by = %claims.sub, "question updated");

    Ok(Json(question))
}

#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such question")
    )
)]
pub async fn delete_question(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_question(id).await?;
    cache.invalidate(Resource::Question).await;
    tracing::info!(id, by = %claims.sub, "question deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/questions/stats",
    tag = "questions",
    responses((status = 200, description = "Question counts", body = QuestionStats))
)]
pub async fn question_stats(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
) -> Result<impl IntoResponse, AppError> {
    let questions = cached_questions(&store, &cache, "").await?;
    Ok(Json(QuestionStats::from_questions(&questions)))
}
