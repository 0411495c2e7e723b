use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{record_outcome, PushHandle};
use crate::error::Result;
use crate::models::FavoriteRecord;
use crate::storage::{load_snapshot, save_snapshot, Namespace, SnapshotStorage};
use crate::sync::{merge_favorites, SyncContext};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesSnapshot {
    #[serde(default)]
    favorites: Vec<String>,
}

/// Favorited tool slugs, in the order they were added.
pub struct FavoritesStore {
    storage: Arc<dyn SnapshotStorage>,
    context: SyncContext,
    favorites: Vec<String>,
    last_error: Option<String>,
}

impl FavoritesStore {
    pub fn open(storage: Arc<dyn SnapshotStorage>, context: SyncContext) -> Result<Self> {
        let snapshot: FavoritesSnapshot = load_snapshot(storage.as_ref(), Namespace::Favorites)?;
        Ok(Self {
            storage,
            context,
            favorites: snapshot.favorites,
            last_error: None,
        })
    }

    pub fn set_context(&mut self, context: SyncContext) {
        self.context = context;
    }

    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.favorites
    }

    #[must_use]
    pub fn is_favorite(&self, slug: &str) -> bool {
        self.favorites.iter().any(|existing| existing == slug)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Add a favorite. Adding an existing slug changes nothing.
    pub fn add(&mut self, slug: &str) -> Result<PushHandle> {
        if self.is_favorite(slug) {
            return Ok(None);
        }
        self.favorites.push(slug.to_string());
        self.persist()?;

        let slug = slug.to_string();
        Ok(self.context.push("favorite add", move |remote, user_id| {
            let record = FavoriteRecord::new(user_id, slug.clone());
            async move { remote.insert_favorite(&record).await }
        }))
    }

    /// Remove a favorite. Removing a missing slug changes nothing.
    pub fn remove(&mut self, slug: &str) -> Result<PushHandle> {
        if !self.is_favorite(slug) {
            return Ok(None);
        }
        self.favorites.retain(|existing| existing != slug);
        self.persist()?;

        let slug = slug.to_string();
        Ok(self.context.push("favorite remove", move |remote, user_id| {
            let slug = slug.clone();
            async move { remote.delete_favorite(&user_id, &slug).await }
        }))
    }

    /// Union local and remote favorites; upload local-only slugs.
    pub async fn sync(&mut self) -> Result<()> {
        let result = self.sync_inner().await;
        record_outcome(&mut self.last_error, result)
    }

    /// Replace local favorites with the remote list.
    pub async fn load_from_cloud(&mut self) -> Result<()> {
        let result = self.load_inner().await;
        record_outcome(&mut self.last_error, result)
    }

    async fn sync_inner(&mut self) -> Result<()> {
        let Some(user_id) = self.context.user_id().map(str::to_string) else {
            return Ok(());
        };

        let remote = self.context.remote().list_favorites(&user_id).await?;
        let merged = merge_favorites(&self.favorites, &remote);
        tracing::debug!(
            "Favorites sync: {} local, {} remote, {} to upload",
            self.favorites.len(),
            remote.len(),
            merged.upload.len()
        );

        for slug in &merged.upload {
            self.context
                .remote()
                .insert_favorite(&FavoriteRecord::new(user_id.clone(), slug.clone()))
                .await?;
        }

        self.favorites = merged.local;
        self.persist()
    }

    async fn load_inner(&mut self) -> Result<()> {
        let Some(user_id) = self.context.user_id().map(str::to_string) else {
            return Ok(());
        };

        let remote = self.context.remote().list_favorites(&user_id).await?;
        self.favorites = remote.into_iter().map(|row| row.tool_slug).collect();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        save_snapshot(
            self.storage.as_ref(),
            Namespace::Favorites,
            &FavoritesSnapshot {
                favorites: self.favorites.clone(),
            },
        )
    }
}
