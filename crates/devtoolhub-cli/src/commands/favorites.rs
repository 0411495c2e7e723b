use std::path::Path;

use devtoolhub_core::catalog;
use devtoolhub_core::stores::FavoritesStore;

use crate::cli::FavoritesCommands;
use crate::commands::common::{
    await_push, format_tool_lines, known_tool, local_context, open_storage, signed_in_context,
    sync_context,
};
use crate::error::CliError;

pub async fn run_favorites(
    command: FavoritesCommands,
    data_dir: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let storage = open_storage(data_dir)?;
    match command {
        FavoritesCommands::Add { slug } => {
            let tool = known_tool(&slug)?;
            let mut store = FavoritesStore::open(storage, sync_context(profile).await?)?;
            let push = store.add(tool.slug)?;
            await_push(push).await;
            println!("Added {} to favorites", tool.slug);
        }
        FavoritesCommands::Remove { slug } => {
            let slug = slug.trim();
            let mut store = FavoritesStore::open(storage, sync_context(profile).await?)?;
            if !store.is_favorite(slug) {
                println!("{slug} is not a favorite");
                return Ok(());
            }
            let push = store.remove(slug)?;
            await_push(push).await;
            println!("Removed {slug} from favorites");
        }
        FavoritesCommands::List { json } => {
            let store = FavoritesStore::open(storage, local_context())?;
            if json {
                println!("{}", serde_json::to_string_pretty(store.list())?);
            } else if store.list().is_empty() {
                println!("No favorites yet.");
            } else {
                let tools = store
                    .list()
                    .iter()
                    .filter_map(|slug| catalog::by_slug(slug))
                    .collect::<Vec<_>>();
                for line in format_tool_lines(&tools) {
                    println!("{line}");
                }
            }
        }
        FavoritesCommands::Sync => {
            let mut store = FavoritesStore::open(storage, signed_in_context(profile).await?)?;
            store.sync().await?;
            println!("Favorites synced ({} total)", store.list().len());
        }
    }
    Ok(())
}
