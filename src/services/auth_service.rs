use axum::Extension;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;

use crate::db::entities::user;
use crate::db::services::profile_service;
use crate::server::config::ServerConfig;
use crate::web::error::{conflict_on_unique_violation, AppError};
use crate::web::models::{AuthenticatedUser, Claims, LoginRequest, LoginResponse, RegisterRequest, UserResponse};

pub async fn register_user(
    pool: &DatabaseConnection,
    req: RegisterRequest,
    config: &ServerConfig,
) -> Result<UserResponse, AppError> {
    let username = req.username.trim().to_string();
    if username.is_empty() || req.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "Username must not be empty and the password needs at least 8 characters.".to_string(),
        ));
    }

    let existing_user = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(pool)
        .await?;
    if existing_user.is_some() {
        return Err(AppError::UserAlreadyExists("Username is already taken.".to_string()));
    }

    let password_hash = hash(&req.password, config.password_hash_cost)
        .map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    let now = Utc::now();
    let txn = pool.begin().await?;
    let user_model = user::ActiveModel {
        username: Set(username),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| conflict_on_unique_violation(e, "Username is already taken."))?;

    let display_name = req
        .display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    profile_service::create_profile(&txn, user_model.id, display_name).await?;
    txn.commit().await?;

    info!(user_id = user_model.id, username = %user_model.username, "Registered new user.");
    Ok(UserResponse {
        id: user_model.id,
        username: user_model.username,
    })
}

pub async fn login_user(
    pool: &DatabaseConnection,
    req: LoginRequest,
    config: &ServerConfig,
) -> Result<LoginResponse, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput("Username and password must not be empty.".to_string()));
    }

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(req.username.trim()))
        .one(pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;
    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, &config.jwt_secret, config.token_ttl_hours)
}

pub fn create_jwt_for_user(
    user: &user::Model,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<LoginResponse, AppError> {
    let expiration = (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize;

    let claims = Claims {
        sub: user.username.clone(),
        user_id: user.id,
        exp: expiration,
    };

    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(jwt_secret.as_ref()))
        .map_err(|e| AppError::TokenCreationError(e.to_string()))?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        username: user.username.clone(),
    })
}

pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<axum::Json<UserResponse>, AppError> {
    Ok(axum::Json(UserResponse {
        id: user.id,
        username: user.username,
    }))
}
