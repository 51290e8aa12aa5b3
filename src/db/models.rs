use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::{flashcard, profile};
use crate::db::enums::{Category, ThemeMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub content: String,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<flashcard::Model> for Flashcard {
    fn from(model: flashcard::Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            image: model.image_url,
            category: model.category,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: i32,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub onboarding_completed: bool,
    pub selected_categories: Vec<Category>,
    pub theme_mode: ThemeMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<profile::Model> for Profile {
    fn from(model: profile::Model) -> Self {
        Self {
            user_id: model.user_id,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            onboarding_completed: model.onboarding_completed,
            selected_categories: model.selected_categories.0,
            theme_mode: model.theme_mode,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A catalog entry, flagged with whether the caller follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub name: Category,
    pub emoji: String,
    pub description: String,
    pub selected: bool,
}

/// One tile of the categories matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: Category,
    pub emoji: String,
    pub description: String,
    pub thought_count: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryThoughts {
    pub category: Category,
    pub emoji: String,
    pub thoughts: Vec<Flashcard>,
    pub sample_thoughts: Vec<String>,
}

/// State after a category mutation, so callers never need to re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdateOutcome {
    pub profile: Profile,
    pub categories: Vec<CategorySummary>,
    pub sample_thoughts_added: usize,
    pub flashcards_removed: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOutcome {
    pub profile: Profile,
    pub sample_thoughts_added: usize,
    pub message: String,
}
