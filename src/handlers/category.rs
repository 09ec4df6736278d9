// src/handlers/category.rs

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
    models::category::{Category, CategoryInput, CategoryStats},
    state::Db,
    utils::{
        jwt::Claims,
        listing::{ListParams, filter_by, paginate},
    },
};

/// Loads the (filtered) category list through the cache.
async fn cached_categories(
    store: &Db,
    cache: &ListCache,
    filter: &str,
) -> Result<Arc<Vec<Category>>, AppError> {
    cache
        .get_or_load(Resource::Category, filter, move || async move {
            let categories = store.list_categories().await?;
            Ok(filter_by(categories, filter, |c| c.name.as_str()))
        })
        .await
}

/// Lists categories sorted by name, optionally searched and paged.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    params(ListParams),
    responses((status = 200, description = "Categories by name", body = [Category]))
)]
pub async fn list_categories(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let categories = cached_categories(&store, &cache, &params.filter()).await?;
    Ok(Json(paginate(&categories, params.page, params.per_page)))
}

/// Creates a category.
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_category(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, AppError> {
    let category = store.create_category(&payload).await?;
    cache.invalidate(Resource::Category).await;
    tracing::info!(id = category.id, by = %claims.sub, "category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// Retrieves a single category by ID.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Found", body = Category),
        (status = 404, description = "No such category")
    )
)]
pub async fn get_category(
    State(store): State<Db>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let category = store
        .get_category(id)
        .await?
        .ok_or(AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}

/// Returns the most recently created category, or `null` when there is none.
#[utoipa::path(
    get,
    path = "/api/categories/latest",
    tag = "categories",
    responses((status = 200, description = "Latest category or null", body = Category))
)]
pub async fn latest_category(State(store): State<Db>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.latest_category().await?))
}

/// Replaces every field of a category.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Updated", body = Category),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "No such category")
    )
)]
pub async fn update_category(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, AppError> {
    let category = store.update_category(id, &payload).await?;
    cache.invalidate(Resource::Category).await;
    tracing::info!(id, by = %claims.sub, "category updated");

    Ok(Json(category))
}

/// Deletes a category by ID. Refused while questions still use it.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such category"),
        (status = 409, description = "Category has questions")
    )
)]
pub async fn delete_category(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_category(id).await?;
    cache.invalidate(Resource::Category).await;
    tracing::info!(id, by = %claims.sub, "category deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Counts over the full category list.
#[utoipa::path(
    get,
    path = "/api/categories/stats",
    tag = "categories",
    responses((status = 200, description = "Category counts", body = CategoryStats))
)]
pub async fn category_stats(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
) -> Result<impl IntoResponse, AppError> {
    let categories = cached_categories(&store, &cache, "").await?;
    Ok(Json(CategoryStats::from_categories(&categories)))
}
