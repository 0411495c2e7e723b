use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use devtoolhub_core::catalog;
use devtoolhub_core::models::{HistoryEntry, Tool};
use devtoolhub_core::remote::{MemoryTables, SupabaseTables};
use devtoolhub_core::storage::{FileSnapshotStorage, SnapshotStorage};
use devtoolhub_core::stores::PushHandle;
use devtoolhub_core::sync::SyncContext;
use serde::Serialize;

use crate::auth::SupabaseAuthService;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub const DATA_DIR_ENV: &str = "DEVTOOLHUB_DATA_DIR";
pub const PASSPHRASE_ENV: &str = "DEVTOOLHUB_MASTER_PASSPHRASE";
pub const CONVERT_API_KEY_ENV: &str = "CLOUDCONVERT_API_KEY";

#[derive(Debug, Serialize)]
pub struct HistoryListItem {
    pub tool_slug: String,
    pub name: Option<&'static str>,
    pub timestamp: String,
    pub relative_time: Option<String>,
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(dir) = cli_data_dir.or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from)) {
        return Ok(dir);
    }
    default_data_dir()
}

pub fn default_data_dir() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("devtoolhub"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

pub fn open_storage(data_dir: &Path) -> Result<Arc<dyn SnapshotStorage>, CliError> {
    Ok(Arc::new(FileSnapshotStorage::open(data_dir)?))
}

/// Context for a signed-out session: pushes and syncs become no-ops.
pub fn local_context() -> SyncContext {
    SyncContext::new(Arc::new(MemoryTables::default()), None)
}

/// Sync context for the profile's signed-in user, or a local one.
pub async fn sync_context(profile: Option<&str>) -> Result<SyncContext, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile);
    let Some(profile) = config.profile(&profile_name) else {
        tracing::debug!("Profile '{}' not configured; running locally", profile_name);
        return Ok(local_context());
    };

    let bootstrap = profile.bootstrap();
    let Some(service) = SupabaseAuthService::new_for_profile(&profile_name, profile)
        .map_err(|error| CliError::Auth(error.to_string()))?
    else {
        return Ok(local_context());
    };
    let Some(session) = service
        .restore_session()
        .await
        .map_err(|error| CliError::Auth(error.to_string()))?
    else {
        tracing::debug!("Profile '{}' is signed out; running locally", profile_name);
        return Ok(local_context());
    };
    let Some((url, anon_key)) = bootstrap.supabase() else {
        return Ok(local_context());
    };

    let tables = SupabaseTables::new(url, anon_key, session.access_token.clone())
        .map_err(|error| CliError::Config(error.to_string()))?;
    tracing::info!("Cloud sync enabled via profile '{}'", profile_name);
    Ok(SyncContext::new(Arc::new(tables), Some(session.user)))
}

/// Like [`sync_context`], but fails when nobody is signed in.
pub async fn signed_in_context(profile: Option<&str>) -> Result<SyncContext, CliError> {
    let context = sync_context(profile).await?;
    if context.user().is_none() {
        return Err(CliError::SyncNotConfigured);
    }
    Ok(context)
}

/// Wait for a background push so the process does not exit mid-request.
pub async fn await_push(push: PushHandle) {
    let Some(handle) = push else {
        return;
    };
    match handle.await {
        Ok(true) => {}
        Ok(false) => eprintln!("Warning: saved locally, but the cloud update failed"),
        Err(error) => tracing::warn!("Push task failed: {}", error),
    }
}

pub fn resolve_passphrase(explicit: Option<String>) -> Result<String, CliError> {
    explicit
        .or_else(|| env::var(PASSPHRASE_ENV).ok())
        .filter(|value| !value.is_empty())
        .ok_or(CliError::MissingPassphrase)
}

pub fn known_tool(slug: &str) -> Result<&'static Tool, CliError> {
    let slug = slug.trim();
    catalog::by_slug(slug).ok_or_else(|| CliError::UnknownTool(slug.to_string()))
}

/// Argument text, or piped stdin when the argument is omitted.
pub fn read_input(input: Option<String>) -> Result<String, CliError> {
    if let Some(input) = input {
        return Ok(input);
    }
    read_piped_stdin()?.ok_or(CliError::EmptyInput)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

pub fn format_tool_lines(tools: &[&Tool]) -> Vec<String> {
    tools
        .iter()
        .map(|tool| {
            format!(
                "{:<20}  {:<20}  {:<12}  {}",
                tool.slug, tool.name, tool.category, tool.description
            )
        })
        .collect()
}

pub fn history_to_list_item(entry: &HistoryEntry) -> HistoryListItem {
    let now_ms = Utc::now().timestamp_millis();
    HistoryListItem {
        tool_slug: entry.tool_slug.clone(),
        name: catalog::by_slug(&entry.tool_slug).map(|tool| tool.name),
        timestamp: entry.timestamp.clone(),
        relative_time: entry
            .parsed_timestamp()
            .map(|instant| format_relative_time(instant.timestamp_millis(), now_ms)),
    }
}

pub fn format_history_lines(entries: &[HistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let item = history_to_list_item(entry);
            format!(
                "{:<20}  {:<20}  {}",
                item.tool_slug,
                item.name.unwrap_or("(unknown tool)"),
                item.relative_time.unwrap_or(item.timestamp)
            )
        })
        .collect()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
