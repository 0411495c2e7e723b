//! Set-union reconciliation of local and remote rows.
//!
//! Nothing is ever removed by a merge: there are no tombstones, so a row
//! deleted on one side while the other still holds it comes back.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{FavoriteRecord, HistoryEntry, HistoryRecord, PasswordEntry};
use crate::util::parse_iso_timestamp;

/// Most history entries kept locally.
pub const HISTORY_LIMIT: usize = 50;

/// Result of a merge: the new local state plus local-only rows to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged<T> {
    pub local: Vec<T>,
    pub upload: Vec<T>,
}

/// Union favorites by slug. Local order is kept; remote-only slugs follow.
#[must_use]
pub fn merge_favorites(local: &[String], remote: &[FavoriteRecord]) -> Merged<String> {
    let remote_slugs: HashSet<&str> = remote.iter().map(|row| row.tool_slug.as_str()).collect();
    let upload = local
        .iter()
        .filter(|slug| !remote_slugs.contains(slug.as_str()))
        .cloned()
        .collect();

    let mut merged = local.to_vec();
    for row in remote {
        if !merged.contains(&row.tool_slug) {
            merged.push(row.tool_slug.clone());
        }
    }

    Merged {
        local: merged,
        upload,
    }
}

/// Union history by `(slug, instant)`, newest first, one entry per slug,
/// capped at [`HISTORY_LIMIT`].
#[must_use]
pub fn merge_history(local: &[HistoryEntry], remote: &[HistoryRecord]) -> Merged<HistoryEntry> {
    let remote: Vec<HistoryEntry> = remote.iter().cloned().map(HistoryEntry::from).collect();

    let upload = local
        .iter()
        .filter(|entry| !remote.iter().any(|other| entry.same_event(other)))
        .cloned()
        .collect();

    let mut merged = local.to_vec();
    for entry in remote {
        if !merged.iter().any(|existing| existing.same_event(&entry)) {
            merged.push(entry);
        }
    }

    Merged {
        local: normalize_history(merged),
        upload,
    }
}

/// Drop uploads older than a full page of remote rows.
///
/// `remote` holds only the newest `page_size` rows, so a local entry older
/// than all of them may already exist further back and must not be sent again.
#[must_use]
pub fn within_remote_window(
    upload: Vec<HistoryEntry>,
    remote: &[HistoryRecord],
    page_size: usize,
) -> Vec<HistoryEntry> {
    if remote.len() < page_size {
        return upload;
    }
    let Some(oldest) = remote
        .iter()
        .filter_map(|row| parse_iso_timestamp(&row.timestamp))
        .min()
    else {
        return Vec::new();
    };
    upload
        .into_iter()
        .filter(|entry| entry.parsed_timestamp().is_some_and(|instant| instant >= oldest))
        .collect()
}

/// Sort newest first, keep the newest entry per slug, cap the length.
///
/// Entries with unparsable timestamps sort last.
#[must_use]
pub fn normalize_history(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    entries.sort_by(newest_first);
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(entry.tool_slug.clone()));
    entries.truncate(HISTORY_LIMIT);
    entries
}

fn newest_first(left: &HistoryEntry, right: &HistoryEntry) -> Ordering {
    match (left.parsed_timestamp(), right.parsed_timestamp()) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Union password entries by id. Local copies win when both sides hold an id.
#[must_use]
pub fn merge_passwords(local: &[PasswordEntry], remote: &[PasswordEntry]) -> Merged<PasswordEntry> {
    let remote_ids: HashSet<_> = remote.iter().map(|entry| entry.id).collect();
    let upload = local
        .iter()
        .filter(|entry| !remote_ids.contains(&entry.id))
        .cloned()
        .collect();

    let local_ids: HashSet<_> = local.iter().map(|entry| entry.id).collect();
    let mut merged = local.to_vec();
    merged.extend(
        remote
            .iter()
            .filter(|entry| !local_ids.contains(&entry.id))
            .cloned(),
    );

    Merged {
        local: merged,
        upload,
    }
}
