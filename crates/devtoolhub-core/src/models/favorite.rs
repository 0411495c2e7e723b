//! Favorite model

use serde::{Deserialize, Serialize};

/// A favorited tool row in the remote `favorites` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Server-assigned row id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning user
    pub user_id: String,
    /// Slug of the favorited tool
    pub tool_slug: String,
    /// RFC 3339 creation timestamp
    #[serde(default)]
    pub created_at: String,
}

impl FavoriteRecord {
    /// Create a favorite row for upload.
    #[must_use]
    pub fn new(user_id: impl Into<String>, tool_slug: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            tool_slug: tool_slug.into(),
            created_at: crate::util::iso_timestamp_now(),
        }
    }
}
