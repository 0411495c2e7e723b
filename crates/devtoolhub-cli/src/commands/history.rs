use std::path::Path;
use std::sync::Arc;

use devtoolhub_core::stores::{HistoryStore, PreferencesStore};

use crate::cli::HistoryCommands;
use crate::commands::common::{
    await_push, format_history_lines, history_to_list_item, known_tool, local_context,
    open_storage, signed_in_context, sync_context, HistoryListItem,
};
use crate::error::CliError;

pub async fn run_history(
    command: HistoryCommands,
    data_dir: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let storage = open_storage(data_dir)?;
    match command {
        HistoryCommands::Record { slug } => {
            let tool = known_tool(&slug)?;
            PreferencesStore::open(Arc::clone(&storage))?.touch_recent(tool.slug)?;
            let mut store = HistoryStore::open(storage, sync_context(profile).await?)?;
            let push = store.add(tool.slug)?;
            await_push(push).await;
            println!("Recorded use of {}", tool.slug);
        }
        HistoryCommands::List { limit, json } => {
            let store = HistoryStore::open(storage, local_context())?;
            let entries = &store.entries()[..limit.min(store.entries().len())];
            if json {
                let items = entries
                    .iter()
                    .map(history_to_list_item)
                    .collect::<Vec<HistoryListItem>>();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if entries.is_empty() {
                println!("No history yet.");
            } else {
                for line in format_history_lines(entries) {
                    println!("{line}");
                }
            }
        }
        HistoryCommands::Clear => {
            let mut store = HistoryStore::open(storage, local_context())?;
            store.clear()?;
            println!("History cleared");
        }
        HistoryCommands::Cleanup => {
            let mut store = HistoryStore::open(storage, local_context())?;
            let removed = store.cleanup()?;
            println!("Removed {removed} history entries");
        }
        HistoryCommands::Sync => {
            let mut store = HistoryStore::open(storage, signed_in_context(profile).await?)?;
            store.sync().await?;
            println!("History synced ({} entries)", store.entries().len());
        }
    }
    Ok(())
}
