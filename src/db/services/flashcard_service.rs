use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::entities::flashcard;
use crate::db::enums::Category;
use crate::db::services::profile_service;
use crate::services::image_storage::{is_data_url, ImageStorage};
use crate::web::error::AppError;
use crate::web::models::flashcard_models::{CreateFlashcardRequest, UpdateFlashcardRequest};

/// The user's flashcards, newest first. Ties on `created_at` are broken by id so the
/// order is stable between requests.
pub async fn list_flashcards(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<flashcard::Model>, AppError> {
    Ok(flashcard::Entity::find()
        .filter(flashcard::Column::UserId.eq(user_id))
        .order_by_desc(flashcard::Column::CreatedAt)
        .order_by_desc(flashcard::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_flashcard(
    db: &DatabaseConnection,
    user_id: i32,
    id: Uuid,
) -> Result<flashcard::Model, AppError> {
    flashcard::Entity::find_by_id(id)
        .filter(flashcard::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flashcard not found".to_string()))
}

pub async fn create_flashcard(
    db: &DatabaseConnection,
    storage: &ImageStorage,
    user_id: i32,
    payload: CreateFlashcardRequest,
) -> Result<flashcard::Model, AppError> {
    let content = validate_content(&payload.content)?;
    let category = match payload.category {
        Some(name) => Some(validate_category(db, user_id, &name).await?),
        None => None,
    };
    let image_url = resolve_image(storage, user_id, payload.image).await?;

    let now = Utc::now();
    let inserted = flashcard::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        content: Set(content),
        image_url: Set(image_url.clone()),
        category: Set(category),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await;

    match inserted {
        Ok(model) => {
            info!(user_id, flashcard_id = %model.id, "Created flashcard.");
            Ok(model)
        }
        Err(e) => {
            if let Some(url) = image_url.as_deref() {
                storage.remove_by_url(user_id, url).await;
            }
            Err(e.into())
        }
    }
}

pub async fn update_flashcard(
    db: &DatabaseConnection,
    storage: &ImageStorage,
    user_id: i32,
    id: Uuid,
    payload: UpdateFlashcardRequest,
) -> Result<flashcard::Model, AppError> {
    let existing = get_flashcard(db, user_id, id).await?;
    let old_image = existing.image_url.clone();
    let mut active = existing.into_active_model();

    if let Some(content) = payload.content {
        active.content = Set(validate_content(&content)?);
    }
    if let Some(category) = payload.category {
        let category = match category {
            Some(name) => Some(validate_category(db, user_id, &name).await?),
            None => None,
        };
        active.category = Set(category);
    }
    let mut new_image = old_image.clone();
    if let Some(image) = payload.image {
        new_image = match image {
            Some(value) if old_image.as_deref() == Some(value.trim()) => old_image.clone(),
            other => resolve_image(storage, user_id, other).await?,
        };
        active.image_url = Set(new_image.clone());
    }
    active.updated_at = Set(Utc::now());

    let updated = match active.update(db).await {
        Ok(model) => model,
        Err(e) => {
            if new_image != old_image {
                if let Some(url) = new_image.as_deref() {
                    storage.remove_by_url(user_id, url).await;
                }
            }
            return Err(e.into());
        }
    };

    if new_image != old_image {
        if let Some(url) = old_image.as_deref() {
            storage.remove_by_url(user_id, url).await;
        }
    }
    Ok(updated)
}

/// Deletes the flashcard, then its stored image. Image removal failures do not fail the call.
pub async fn delete_flashcard(
    db: &DatabaseConnection,
    storage: &ImageStorage,
    user_id: i32,
    id: Uuid,
) -> Result<(), AppError> {
    let existing = get_flashcard(db, user_id, id).await?;

    let result = flashcard::Entity::delete_many()
        .filter(flashcard::Column::Id.eq(id))
        .filter(flashcard::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Flashcard not found".to_string()));
    }

    if let Some(url) = existing.image_url.as_deref() {
        storage.remove_by_url(user_id, url).await;
    }
    info!(user_id, flashcard_id = %id, "Deleted flashcard.");
    Ok(())
}

/// Deletes every flashcard the user filed under `category` and returns the removed rows.
pub async fn delete_in_category<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    category: Category,
) -> Result<Vec<flashcard::Model>, DbErr> {
    let removed = flashcard::Entity::find()
        .filter(flashcard::Column::UserId.eq(user_id))
        .filter(flashcard::Column::Category.eq(category))
        .all(conn)
        .await?;
    if removed.is_empty() {
        return Ok(removed);
    }

    flashcard::Entity::delete_many()
        .filter(flashcard::Column::UserId.eq(user_id))
        .filter(flashcard::Column::Category.eq(category))
        .exec(conn)
        .await?;
    Ok(removed)
}

/// The user's flashcards in one category, newest first.
pub async fn list_in_category<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    category: Category,
) -> Result<Vec<flashcard::Model>, DbErr> {
    flashcard::Entity::find()
        .filter(flashcard::Column::UserId.eq(user_id))
        .filter(flashcard::Column::Category.eq(category))
        .order_by_desc(flashcard::Column::CreatedAt)
        .order_by_desc(flashcard::Column::Id)
        .all(conn)
        .await
}

/// Count and latest `updated_at` of the user's flashcards in one category.
pub async fn category_stats<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    category: Category,
) -> Result<(u64, Option<DateTime<Utc>>), DbErr> {
    let count = flashcard::Entity::find()
        .filter(flashcard::Column::UserId.eq(user_id))
        .filter(flashcard::Column::Category.eq(category))
        .count(conn)
        .await?;
    if count == 0 {
        return Ok((0, None));
    }

    let latest = flashcard::Entity::find()
        .filter(flashcard::Column::UserId.eq(user_id))
        .filter(flashcard::Column::Category.eq(category))
        .order_by_desc(flashcard::Column::UpdatedAt)
        .one(conn)
        .await?;
    Ok((count, latest.map(|card| card.updated_at)))
}

fn validate_content(content: &str) -> Result<String, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Flashcard content must not be empty.".to_string()));
    }
    Ok(trimmed.to_string())
}

/// A flashcard may only be filed under one of the owner's selected categories.
async fn validate_category(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
) -> Result<Category, AppError> {
    let category = name.parse::<Category>().map_err(AppError::InvalidInput)?;
    let profile = profile_service::get_profile(db, user_id).await?;
    if !profile.selected_categories.contains(category) {
        warn!(user_id, category = %category, "Rejected flashcard for an unselected category.");
        return Err(AppError::InvalidInput(format!(
            "Category {category} is not one of your selected categories."
        )));
    }
    Ok(category)
}

/// Uploads data-URL images; existing URLs are kept as-is and blank values mean no image.
async fn resolve_image(
    storage: &ImageStorage,
    user_id: i32,
    image: Option<String>,
) -> Result<Option<String>, AppError> {
    let Some(value) = image.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if is_data_url(&value) {
        Ok(Some(storage.upload_data_url(user_id, &value).await?))
    } else {
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_trimmed_and_required() {
        assert_eq!(validate_content("  hello \n").unwrap(), "hello");
        assert!(matches!(validate_content("   "), Err(AppError::InvalidInput(_))));
        assert!(matches!(validate_content(""), Err(AppError::InvalidInput(_))));
    }
}
