use std::path::PathBuf;

use clap::CommandFactory;
use devtoolhub_core::models::{HistoryEntry, PasswordRecord};
use devtoolhub_core::stores::{FavoritesStore, HistoryStore, PasswordStore, PreferencesStore};
use devtoolhub_core::vault::{DecryptedEntry, EntryContents};
use pretty_assertions::assert_eq;

use crate::cli::{
    Cli, CompletionShell, ConvertCommands, FavoritesCommands, HistoryCommands, VaultCommands,
};
use crate::commands::common::{
    format_history_lines, format_relative_time, format_tool_lines, history_to_list_item,
    known_tool, local_context, open_storage, read_input, resolve_data_dir, resolve_passphrase,
};
use crate::commands::completions::run_completions;
use crate::commands::config::{apply_profile_values, missing_sync_fields, ProfileValues};
use crate::commands::convert::run_convert;
use crate::commands::favorites::run_favorites;
use crate::commands::history::run_history;
use crate::commands::vault::{format_vault_lines, parse_entry_id, run_vault, vault_to_list_item};
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

const PASSPHRASE: &str = "correct horse battery";

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
}

#[test]
fn explicit_data_dir_wins() {
    let resolved = resolve_data_dir(Some(PathBuf::from("/tmp/devtoolhub-test"))).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/devtoolhub-test"));
}

#[test]
fn explicit_passphrase_wins() {
    assert_eq!(
        resolve_passphrase(Some("from-flag-123".to_string())).unwrap(),
        "from-flag-123"
    );
}

#[test]
fn read_input_prefers_argument() {
    assert_eq!(read_input(Some("{\"a\":1}".to_string())).unwrap(), "{\"a\":1}");
}

#[test]
fn known_tool_rejects_unknown_slug() {
    assert_eq!(known_tool(" json-formatter ").unwrap().slug, "json-formatter");
    assert!(matches!(
        known_tool("teleporter"),
        Err(CliError::UnknownTool(slug)) if slug == "teleporter"
    ));
}

#[test]
fn tool_lines_include_slug_and_category() {
    let tool = known_tool("cron-generator").unwrap();
    let lines = format_tool_lines(&[tool]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("cron-generator"));
    assert!(lines[0].contains(tool.category));
}

#[test]
fn history_items_name_known_tools() {
    let known = history_to_list_item(&HistoryEntry::now("uuid-generator"));
    assert_eq!(known.name, Some("UUID Generator"));
    assert_eq!(known.relative_time.as_deref(), Some("just now"));

    let malformed = HistoryEntry {
        tool_slug: "retired-tool".to_string(),
        timestamp: "yesterday".to_string(),
    };
    let item = history_to_list_item(&malformed);
    assert_eq!(item.name, None);
    assert_eq!(item.relative_time, None);
    let lines = format_history_lines(&[malformed]);
    assert!(lines[0].contains("(unknown tool)"));
    assert!(lines[0].ends_with("yesterday"));
}

#[test]
fn vault_items_mask_passwords_unless_revealed() {
    let entry = DecryptedEntry {
        id: devtoolhub_core::models::EntryId::new(),
        category: "Work".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
        contents: EntryContents::Readable(PasswordRecord::new(
            "github.com",
            "octocat",
            "hunter22",
        )),
    };

    let masked = vault_to_list_item(&entry, false);
    assert_eq!(masked.password.as_deref(), Some("********"));
    assert!(masked.readable);
    let revealed = vault_to_list_item(&entry, true);
    assert_eq!(revealed.password.as_deref(), Some("hunter22"));

    let unreadable = DecryptedEntry {
        contents: EntryContents::Unreadable {
            reason: "bad tag".to_string(),
        },
        ..entry
    };
    let item = vault_to_list_item(&unreadable, true);
    assert!(!item.readable);
    assert_eq!(item.password, None);
    assert!(format_vault_lines(&[item])[0].contains("unreadable"));
}

#[test]
fn parse_entry_id_rejects_garbage() {
    assert!(matches!(
        parse_entry_id("not-an-id"),
        Err(CliError::InvalidEntryId(_))
    ));
    let id = devtoolhub_core::models::EntryId::new();
    assert_eq!(parse_entry_id(&format!(" {id} ")).unwrap(), id);
}

#[test]
fn profile_values_are_applied_and_validated() {
    let mut config = CliProfilesConfig::default();
    apply_profile_values(
        &mut config,
        "work",
        ProfileValues {
            supabase_url: Some("https://project.supabase.co/".to_string()),
            supabase_anon_key: Some("anon-key".to_string()),
            convert_api_url: Some("https://convert.example.com/v2/".to_string()),
        },
        false,
    )
    .unwrap();

    assert_eq!(config.active_profile.as_deref(), Some("work"));
    let profile = config.profile("work").unwrap();
    assert_eq!(
        profile.supabase_url.as_deref(),
        Some("https://project.supabase.co")
    );
    assert_eq!(
        profile.convert_api_url.as_deref(),
        Some("https://convert.example.com/v2")
    );
    assert!(missing_sync_fields(profile).is_empty());

    let error = apply_profile_values(
        &mut config,
        "broken",
        ProfileValues {
            supabase_url: Some("ftp://project".to_string()),
            supabase_anon_key: Some("anon-key".to_string()),
            convert_api_url: None,
        },
        true,
    )
    .unwrap_err();
    assert!(matches!(error, CliError::Config(_)));
    assert!(config.profile("broken").is_none());
    assert_eq!(config.active_profile.as_deref(), Some("work"));
}

#[test]
fn missing_sync_fields_lists_gaps() {
    assert_eq!(
        missing_sync_fields(&CliProfile::default()),
        vec!["supabase_url", "supabase_anon_key"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn favorites_commands_update_local_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    run_favorites(
        FavoritesCommands::Add {
            slug: "json-formatter".to_string(),
        },
        dir.path(),
        Some("cli-test-offline"),
    )
    .await
    .unwrap();
    let store = FavoritesStore::open(open_storage(dir.path()).unwrap(), local_context()).unwrap();
    assert_eq!(store.list(), ["json-formatter".to_string()]);

    let error = run_favorites(
        FavoritesCommands::Add {
            slug: "teleporter".to_string(),
        },
        dir.path(),
        Some("cli-test-offline"),
    )
    .await
    .unwrap_err();
    assert!(matches!(error, CliError::UnknownTool(_)));

    run_favorites(
        FavoritesCommands::Remove {
            slug: "json-formatter".to_string(),
        },
        dir.path(),
        Some("cli-test-offline"),
    )
    .await
    .unwrap();
    let store = FavoritesStore::open(open_storage(dir.path()).unwrap(), local_context()).unwrap();
    assert!(store.list().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn history_record_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    for slug in ["jwt-decoder", "url-parser", "jwt-decoder"] {
        run_history(
            HistoryCommands::Record {
                slug: slug.to_string(),
            },
            dir.path(),
            Some("cli-test-offline"),
        )
        .await
        .unwrap();
    }

    let store = HistoryStore::open(open_storage(dir.path()).unwrap(), local_context()).unwrap();
    let slugs = store
        .entries()
        .iter()
        .map(|entry| entry.tool_slug.as_str())
        .collect::<Vec<_>>();
    assert_eq!(slugs, vec!["jwt-decoder", "url-parser"]);
    let preferences = PreferencesStore::open(open_storage(dir.path()).unwrap()).unwrap();
    assert_eq!(preferences.get().recent_tools, vec!["jwt-decoder", "url-parser"]);

    run_history(HistoryCommands::Clear, dir.path(), None)
        .await
        .unwrap();
    let store = HistoryStore::open(open_storage(dir.path()).unwrap(), local_context()).unwrap();
    assert!(store.entries().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn vault_sync_requires_sign_in() {
    let dir = tempfile::tempdir().unwrap();
    let error = run_vault(
        VaultCommands::Sync,
        Some(PASSPHRASE.to_string()),
        dir.path(),
        Some("cli-test-offline"),
    )
    .await
    .unwrap_err();
    assert!(matches!(error, CliError::SyncNotConfigured));
}

#[tokio::test(flavor = "multi_thread")]
async fn vault_add_encrypts_and_remove_deletes() {
    let dir = tempfile::tempdir().unwrap();
    run_vault(
        VaultCommands::Add {
            website: "example.com".to_string(),
            username: "dev".to_string(),
            password: Some("s3cret-value".to_string()),
            category: "Work".to_string(),
        },
        Some(PASSPHRASE.to_string()),
        dir.path(),
        Some("cli-test-offline"),
    )
    .await
    .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("password-vault.json")).unwrap();
    assert!(!raw.contains("s3cret-value"));

    let mut store =
        PasswordStore::open(open_storage(dir.path()).unwrap(), local_context()).unwrap();
    store.unlock(PASSPHRASE).unwrap();
    let entries = store.decrypted().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].record().map(|record| record.website.as_str()),
        Some("example.com")
    );

    let id = entries[0].id.to_string();
    run_vault(
        VaultCommands::Remove { id },
        None,
        dir.path(),
        Some("cli-test-offline"),
    )
    .await
    .unwrap();
    let store = PasswordStore::open(open_storage(dir.path()).unwrap(), local_context()).unwrap();
    assert!(store.entries().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn convert_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let error = run_convert(
        ConvertCommands::PdfToDocx {
            path: dir.path().join("missing.pdf"),
            api_key: Some("key".to_string()),
        },
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(error, CliError::Convert(_)));
}

#[test]
fn run_completions_writes_bash_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("devtoolhub.bash");
    run_completions(CompletionShell::Bash, Some(&output)).unwrap();
    let script = std::fs::read_to_string(&output).unwrap();
    assert!(script.contains("devtoolhub"));
    assert!(script.contains("vault"));
}
