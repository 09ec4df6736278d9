// src/handlers/avatar.rs

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
    models::avatar::{Avatar, AvatarInput, AvatarStats},
    state::Db,
    utils::{
        jwt::Claims,
        listing::{ListParams, filter_by, paginate},
    },
};

async fn cached_avatars(
    store: &Db,
    cache: &ListCache,
    filter: &str,
) -> Result<Arc<Vec<Avatar>>, AppError> {
    cache
        .get_or_load(Resource::Avatar, filter, move || async move {
            let avatars = store.list_avatars().await?;
            Ok(filter_by(avatars, filter, |a| a.url.as_str()))
        })
        .await
}

/// Lists avatars by id, optionally searched by URL and paged.
#[utoipa::path(
    get,
    path = "/api/avatars",
    tag = "avatars",
    params(ListParams),
    responses((status = 200, description = "Avatars by id", body = [Avatar]))
)]
pub async fn list_avatars(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let avatars = cached_avatars(&store, &cache, &params.filter()).await?;
    Ok(Json(paginate(&avatars, params.page, params.per_page)))
}

#[utoipa::path(
    post,
    path = "/api/avatars",
    tag = "avatars",
    request_body = AvatarInput,
    responses(
        (status = 201, description = "Created", body = Avatar),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_avatar(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<AvatarInput>,
) -> Result<impl IntoResponse, AppError> {
    let avatar = store.create_avatar(&payload).await?;
    cache.invalidate(Resource::Avatar).await;
    tracing::info!(id = avatar.id, by = %claims.sub, "avatar created");

    Ok((StatusCode::CREATED, Json(avatar)))
}

#[utoipa::path(
    get,
    path = "/api/avatars/{id}",
    tag = "avatars",
    params(("id" = i64, Path, description = "Avatar id")),
    responses(
        (status = 200, description = "Found", body = Avatar),
        (status = 404, description = "No such avatar")
    )
)]
pub async fn get_avatar(
    State(store): State<Db>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let avatar = store
        .get_avatar(id)
        .await?
        .ok_or(AppError::NotFound("Avatar not found".to_string()))?;

    Ok(Json(avatar))
}

/// Replaces the avatar URL.
#[utoipa::path(
    put,
    path = "/api/avatars/{id}",
    tag = "avatars",
    params(("id" = i64, Path, description = "Avatar id")),
    request_body = AvatarInput,
    responses(
        (status = 200, description = "Updated", body = Avatar),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "No such avatar")
    )
)]
pub async fn update_avatar(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<AvatarInput>,
) -> Result<impl IntoResponse, AppError> {
    let avatar = store.update_avatar(id, &payload).await?;
    cache.invalidate(Resource::Avatar).await;
    tracing::info!(id, by = %claims.sub, "avatar updated");

    Ok(Json(avatar))
}

#[utoipa::path(
    delete,
    path = "/api/avatars/{id}",
    tag = "avatars",
    params(("id" = i64, Path, description = "Avatar id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such avatar")
    )
)]
pub async fn delete_avatar(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_avatar(id).await?;
    cache.invalidate(Resource::Avatar).await;
    tracing::info!(id, by = %claims.sub, "avatar deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/avatars/stats",
    tag = "avatars",
    responses((status = 200, description = "Avatar counts", body = AvatarStats))
)]
pub async fn avatar_stats(
    State(store): State<Db>,
    State(cache): State<Arc<ListCache>>,
) -> Result<impl IntoResponse, AppError> {
    let avatars = cached_avatars(&store, &cache, "").await?;
    Ok(Json(AvatarStats::from_avatars(&avatars)))
}
