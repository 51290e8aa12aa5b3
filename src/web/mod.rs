use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::warn;

use crate::server::config::ServerConfig;
use crate::services::auth_service;
use crate::services::image_storage::{ImageStorage, BUCKET};
use crate::web::{
    error::AppError,
    middleware::auth,
    models::{LoginRequest, RegisterRequest},
    routes::*,
};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

/// Name of the cookie carrying the session JWT.
pub const AUTH_COOKIE: &str = "token";

// Room for the JSON envelope around a base64 image.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub config: Arc<ServerConfig>,
    pub image_storage: Arc<ImageStorage>,
}

async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<models::UserResponse>, AppError> {
    let user_response =
        auth_service::register_user(&app_state.db_pool, payload, &app_state.config).await?;
    Ok(Json(user_response))
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let login_response =
        auth_service::login_user(&app_state.db_pool, payload, &app_state.config).await?;

    let auth_cookie = Cookie::build((AUTH_COOKIE, login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    Ok((jar.add(auth_cookie), Json(login_response)))
}

async fn logout_handler(jar: CookieJar) -> impl IntoResponse {
    let mut removal = Cookie::build((AUTH_COOKIE, "")).path("/").build();
    removal.make_removal();
    (jar.add(removal), Json(serde_json::json!({ "message": "Logged out" })))
}

async fn health_check_handler() -> &'static str {
    "OK"
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS];

    let origin = config
        .frontend_url
        .as_deref()
        .and_then(|url| match HeaderValue::from_str(url.trim_end_matches('/')) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(frontend_url = %url, error = %e, "Ignoring invalid frontend URL, allowing any origin.");
                None
            }
        });

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any),
    }
}

pub fn create_axum_router(
    db_pool: DatabaseConnection,
    config: Arc<ServerConfig>,
    image_storage: Arc<ImageStorage>,
) -> Router {
    let cors = cors_layer(&config);
    let body_limit = config.max_image_bytes / 3 * 4 + BODY_OVERHEAD_BYTES;
    let image_dir = image_storage.root().to_path_buf();

    let app_state = Arc::new(AppState {
        db_pool,
        config,
        image_storage,
    });

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route(
            "/api/auth/me",
            get(auth_service::me)
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/profile",
            profile_routes::create_profile_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/onboarding",
            onboarding_routes::create_onboarding_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/flashcards",
            flashcard_routes::create_flashcard_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/deck",
            deck_routes::create_deck_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/categories",
            category_routes::create_category_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest_service(&format!("/storage/{BUCKET}"), ServeDir::new(image_dir))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
}
