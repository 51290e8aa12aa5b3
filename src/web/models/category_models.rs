use serde::{Deserialize, Serialize};

use crate::db::enums::ThemeMode;
use crate::db::models::Profile;

#[derive(Debug, Deserialize)]
pub struct CategorySelectionRequest {
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThoughtsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub theme_mode: Option<ThemeMode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub onboarding_completed: bool,
    pub profile: Profile,
}
