//! Social feed posts mirrored from Facebook and Instagram.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::SocialPostId;

/// A post imported from an external social platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: SocialPostId,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl SocialPost {
    /// Caption cut to `max_chars` characters with an ellipsis.
    #[must_use]
    pub fn caption_preview(&self, max_chars: usize) -> String {
        let caption = self.caption.as_deref().unwrap_or_default().trim();
        if caption.chars().count() <= max_chars {
            return caption.to_string();
        }
        let mut preview: String = caption.chars().take(max_chars).collect();
        preview.push('…');
        preview
    }
}
