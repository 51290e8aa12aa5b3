use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The fixed set of topics a flashcard can be filed under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Category {
    #[sea_orm(string_value = "Stoicism")]
    Stoicism,
    #[sea_orm(string_value = "Motivation")]
    Motivation,
    #[sea_orm(string_value = "Wisdom")]
    Wisdom,
    #[sea_orm(string_value = "Mindfulness")]
    Mindfulness,
    #[sea_orm(string_value = "Health")]
    Health,
    #[sea_orm(string_value = "Spirituality")]
    Spirituality,
}

/// Emoji shown for a category name the catalog does not know.
pub const FALLBACK_EMOJI: &str = "💭";

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Stoicism,
        Category::Motivation,
        Category::Wisdom,
        Category::Mindfulness,
        Category::Health,
        Category::Spirituality,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Stoicism => "Stoicism",
            Category::Motivation => "Motivation",
            Category::Wisdom => "Wisdom",
            Category::Mindfulness => "Mindfulness",
            Category::Health => "Health",
            Category::Spirituality => "Spirituality",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Stoicism => "🏛️",
            Category::Motivation => "🚀",
            Category::Wisdom => "🦉",
            Category::Mindfulness => "🧘",
            Category::Health => "💪",
            Category::Spirituality => "✨",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Stoicism => "Ancient wisdom for modern resilience",
            Category::Motivation => "Fuel for your dreams and goals",
            Category::Wisdom => "Life lessons and insights",
            Category::Mindfulness => "Present moment awareness",
            Category::Health => "Wellness and vitality",
            Category::Spirituality => "Inner peace and growth",
        }
    }

    /// Emoji for an arbitrary category label, falling back for unknown names.
    pub fn emoji_for(name: &str) -> &'static str {
        name.parse::<Category>()
            .map(|c| c.emoji())
            .unwrap_or(FALLBACK_EMOJI)
    }

    /// Parses a list of names, dropping duplicates while keeping the first occurrence order.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Category>, String> {
        let mut categories = Vec::with_capacity(names.len());
        for name in names {
            let category = name.as_ref().parse::<Category>()?;
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(categories)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[sea_orm(string_value = "light")]
    Light,
    #[sea_orm(string_value = "dark")]
    Dark,
    #[default]
    #[sea_orm(string_value = "system")]
    System,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_distinct_categories() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["Stoicism", "Motivation", "Wisdom", "Mindfulness", "Health", "Spirituality"]
        );
    }

    #[test]
    fn test_parse_is_exact_on_name() {
        assert_eq!("Health".parse::<Category>(), Ok(Category::Health));
        assert_eq!(" Wisdom ".parse::<Category>(), Ok(Category::Wisdom));
        assert!("health".parse::<Category>().is_err());
        assert!("Cooking".parse::<Category>().is_err());
    }

    #[test]
    fn test_emoji_falls_back_for_unknown_names() {
        assert_eq!(Category::emoji_for("Stoicism"), "🏛️");
        assert_eq!(Category::emoji_for("Gardening"), FALLBACK_EMOJI);
    }

    #[test]
    fn test_parse_list_dedupes_in_order() {
        let parsed = Category::parse_list(&["Health", "Wisdom", "Health"]).unwrap();
        assert_eq!(parsed, vec![Category::Health, Category::Wisdom]);

        let err = Category::parse_list(&["Health", "Nope"]).unwrap_err();
        assert_eq!(err, "Unknown category: Nope");
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::Mindfulness).unwrap();
        assert_eq!(json, "\"Mindfulness\"");
        let theme: ThemeMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(theme, ThemeMode::Dark);
    }
}
