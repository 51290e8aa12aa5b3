use serde::{Deserialize, Serialize};

use crate::db::models::Flashcard;
use crate::web::models::deserialize_some;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlashcardRequest {
    pub content: String,
    /// A `data:image/...;base64,` payload to upload, or an existing image URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Absent fields are left untouched; `null` clears `image` or `category`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlashcardRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DeckQuery {
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckView {
    pub card: Option<Flashcard>,
    pub index: usize,
    pub total: usize,
    pub next_index: usize,
    pub previous_index: usize,
    pub progress: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateFlashcardRequest = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert_eq!(absent.image, None);
        assert_eq!(absent.category, None);

        let cleared: UpdateFlashcardRequest =
            serde_json::from_str(r#"{"image":null,"category":null}"#).unwrap();
        assert_eq!(cleared.image, Some(None));
        assert_eq!(cleared.category, Some(None));

        let set: UpdateFlashcardRequest =
            serde_json::from_str(r#"{"category":"Health"}"#).unwrap();
        assert_eq!(set.category, Some(Some("Health".to_string())));
    }
}
