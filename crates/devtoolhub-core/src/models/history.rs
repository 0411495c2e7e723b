//! Tool usage history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::{iso_timestamp_now, parse_iso_timestamp};

/// A local history entry: one tool opened at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tool_slug: String,
    /// RFC 3339 timestamp, kept as text so malformed snapshots can be cleaned up
    pub timestamp: String,
}

impl HistoryEntry {
    #[must_use]
    pub fn now(tool_slug: impl Into<String>) -> Self {
        Self {
            tool_slug: tool_slug.into(),
            timestamp: iso_timestamp_now(),
        }
    }

    /// Parsed timestamp, or `None` when the stored text is not RFC 3339.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_iso_timestamp(&self.timestamp)
    }

    /// Identity used by sync: same slug and same instant.
    ///
    /// Instants are compared after parsing so `Z` and `+00:00` renderings of
    /// the same moment are treated as one event.
    #[must_use]
    pub fn same_event(&self, other: &Self) -> bool {
        if self.tool_slug != other.tool_slug {
            return false;
        }
        match (self.parsed_timestamp(), other.parsed_timestamp()) {
            (Some(left), Some(right)) => left == right,
            _ => self.timestamp == other.timestamp,
        }
    }
}

/// A row of the remote `history` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub tool_slug: String,
    pub timestamp: String,
}

impl HistoryRecord {
    #[must_use]
    pub fn from_entry(user_id: impl Into<String>, entry: &HistoryEntry) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            tool_slug: entry.tool_slug.clone(),
            timestamp: entry.timestamp.clone(),
        }
    }
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        Self {
            tool_slug: record.tool_slug,
            timestamp: record.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_event_compares_instants_not_text() {
        let left = HistoryEntry {
            tool_slug: "jwt-decoder".to_string(),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        };
        let right = HistoryEntry {
            tool_slug: "jwt-decoder".to_string(),
            timestamp: "2024-05-01T10:00:00+00:00".to_string(),
        };
        assert!(left.same_event(&right));
    }

    #[test]
    fn same_event_requires_matching_slug() {
        let left = HistoryEntry {
            tool_slug: "jwt-decoder".to_string(),
            timestamp: "2024-05-01T10:00:00Z".to_string(),
        };
        let right = HistoryEntry {
            tool_slug: "url-parser".to_string(),
            ..left.clone()
        };
        assert!(!left.same_event(&right));
    }

    #[test]
    fn malformed_timestamps_fall_back_to_text_equality() {
        let entry = HistoryEntry {
            tool_slug: "uuid-generator".to_string(),
            timestamp: "yesterday".to_string(),
        };
        assert!(entry.parsed_timestamp().is_none());
        assert!(entry.same_event(&entry.clone()));
    }
}
