use std::path::Path;

use devtoolhub_core::models::{EntryId, PasswordRecord};
use devtoolhub_core::stores::PasswordStore;
use devtoolhub_core::tools::password::{self, GeneratorOptions, DEFAULT_LENGTH};
use devtoolhub_core::vault::{DecryptedEntry, EntryContents};
use serde::Serialize;

use crate::cli::VaultCommands;
use crate::commands::common::{
    await_push, local_context, open_storage, resolve_passphrase, signed_in_context, sync_context,
};
use crate::error::CliError;

const MASK: &str = "********";

#[derive(Debug, Serialize)]
pub struct VaultListItem {
    pub id: String,
    pub category: String,
    pub website: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub readable: bool,
    pub updated_at: String,
}

pub async fn run_vault(
    command: VaultCommands,
    passphrase: Option<String>,
    data_dir: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let storage = open_storage(data_dir)?;
    match command {
        VaultCommands::Add {
            website,
            username,
            password: stored,
            category,
        } => {
            let mut store = PasswordStore::open(storage, sync_context(profile).await?)?;
            store.unlock(&resolve_passphrase(passphrase)?)?;
            let generated = stored.is_none();
            let secret = match stored {
                Some(secret) => secret,
                None => password::generate(DEFAULT_LENGTH, GeneratorOptions::default())?,
            };
            let record = PasswordRecord::new(website, username, secret);
            let (id, push) = store.add_entry(&record, category.trim())?;
            await_push(push).await;
            println!("Added vault entry {id}");
            if generated {
                println!("Generated password: {}", record.password);
            }
        }
        VaultCommands::List { reveal, json } => {
            let mut store = PasswordStore::open(storage, local_context())?;
            store.unlock(&resolve_passphrase(passphrase)?)?;
            let items = store
                .decrypted()?
                .iter()
                .map(|entry| vault_to_list_item(entry, reveal))
                .collect::<Vec<_>>();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("The vault is empty.");
            } else {
                for line in format_vault_lines(&items) {
                    println!("{line}");
                }
            }
        }
        VaultCommands::Update {
            id,
            website,
            username,
            password: secret,
            category,
        } => {
            let id = parse_entry_id(&id)?;
            let mut store = PasswordStore::open(storage, sync_context(profile).await?)?;
            store.unlock(&resolve_passphrase(passphrase)?)?;
            let record = PasswordRecord::new(website, username, secret);
            let push = store.update_entry(id, &record, category.trim())?;
            await_push(push).await;
            println!("Updated vault entry {id}");
        }
        VaultCommands::Remove { id } => {
            let id = parse_entry_id(&id)?;
            let mut store = PasswordStore::open(storage, sync_context(profile).await?)?;
            let push = store.delete_entry(id)?;
            await_push(push).await;
            println!("Removed vault entry {id}");
        }
        VaultCommands::Sync => {
            let mut store = PasswordStore::open(storage, signed_in_context(profile).await?)?;
            store.unlock(&resolve_passphrase(passphrase)?)?;
            store.sync().await?;
            println!("Vault synced ({} entries)", store.entries().len());
        }
    }
    Ok(())
}

pub fn parse_entry_id(value: &str) -> Result<EntryId, CliError> {
    let value = value.trim();
    value
        .parse::<EntryId>()
        .map_err(|_| CliError::InvalidEntryId(value.to_string()))
}

pub fn vault_to_list_item(entry: &DecryptedEntry, reveal: bool) -> VaultListItem {
    let mut item = VaultListItem {
        id: entry.id.to_string(),
        category: entry.category.clone(),
        website: None,
        username: None,
        password: None,
        readable: false,
        updated_at: entry.updated_at.clone(),
    };
    if let EntryContents::Readable(record) = &entry.contents {
        item.website = Some(record.website.clone());
        item.username = Some(record.username.clone());
        item.password = Some(if reveal {
            record.password.clone()
        } else {
            MASK.to_string()
        });
        item.readable = true;
    }
    item
}

pub fn format_vault_lines(items: &[VaultListItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let short_id = item.id.chars().take(13).collect::<String>();
            if item.readable {
                format!(
                    "{short_id:<13}  {:<12}  {:<24}  {:<20}  {}",
                    item.category,
                    item.website.as_deref().unwrap_or_default(),
                    item.username.as_deref().unwrap_or_default(),
                    item.password.as_deref().unwrap_or_default()
                )
            } else {
                format!("{short_id:<13}  {:<12}  (unreadable with this passphrase)", item.category)
            }
        })
        .collect()
}
