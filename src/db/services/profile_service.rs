use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Set,
};

use crate::db::entities::profile::{self, SelectedCategories};
use crate::db::enums::{Category, ThemeMode};
use crate::web::error::AppError;
use crate::web::models::category_models::UpdateProfileRequest;

/// Creates the profile row that accompanies every new user.
pub async fn create_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    display_name: Option<String>,
) -> Result<profile::Model, DbErr> {
    let now = Utc::now();
    profile::ActiveModel {
        user_id: Set(user_id),
        display_name: Set(display_name),
        avatar_url: Set(None),
        onboarding_completed: Set(false),
        selected_categories: Set(SelectedCategories::default()),
        theme_mode: Set(ThemeMode::System),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn get_profile<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<profile::Model, AppError> {
    profile::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i32,
    payload: UpdateProfileRequest,
) -> Result<profile::Model, AppError> {
    let mut active = get_profile(db, user_id).await?.into_active_model();

    if let Some(display_name) = payload.display_name {
        active.display_name = Set(non_blank(display_name));
    }
    if let Some(avatar_url) = payload.avatar_url {
        active.avatar_url = Set(non_blank(avatar_url));
    }
    if let Some(theme_mode) = payload.theme_mode {
        active.theme_mode = Set(theme_mode);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Persists a new category selection, optionally flipping the onboarding flag.
pub async fn save_selection<C: ConnectionTrait>(
    conn: &C,
    profile: profile::Model,
    selection: Vec<Category>,
    onboarding_completed: Option<bool>,
) -> Result<profile::Model, DbErr> {
    let mut active = profile.into_active_model();
    active.selected_categories = Set(SelectedCategories(selection));
    if let Some(completed) = onboarding_completed {
        active.onboarding_completed = Set(completed);
    }
    active.updated_at = Set(Utc::now());
    active.update(conn).await
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
