// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{avatar, category, docs, question},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Nests one sub-router per resource under `/api`, all behind the auth middleware.
/// * Serves the OpenAPI document without authentication.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let category_routes = Router::new()
        .route(
            "/",
            get(category::list_categories).post(category::create_category),
        )
        .route("/latest", get(category::latest_category))
        .route("/stats", get(category::category_stats))
        .route(
            "/{id}",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        );

    let avatar_routes = Router::new()
        .route("/", get(avatar::list_avatars).post(avatar::create_avatar))
        .route("/stats", get(avatar::avatar_stats))
        .route(
            "/{id}",
            get(avatar::get_avatar)
                .put(avatar::update_avatar)
                .delete(avatar::delete_avatar),
        );

    let question_routes = Router::new()
        .route(
            "/",
            get(question::list_questions).post(question::create_question),
        )
        .route("/stats", get(question::question_stats))
        .route(
            "/{id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        );

    let api_routes = Router::new()
        .nest("/categories", category_routes)
        .nest("/avatars", avatar_routes)
        .nest("/questions", question_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api", api_routes)
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
