use std::sync::Arc;

use crate::error::Result;
use crate::models::{Language, Preferences, ThemeMode};
use crate::storage::{load_snapshot, save_snapshot, Namespace, SnapshotStorage};

/// Theme, language and recently opened tools. Never synced.
pub struct PreferencesStore {
    storage: Arc<dyn SnapshotStorage>,
    preferences: Preferences,
}

impl PreferencesStore {
    pub fn open(storage: Arc<dyn SnapshotStorage>) -> Result<Self> {
        let preferences = load_snapshot(storage.as_ref(), Namespace::AppPreferences)?;
        Ok(Self {
            storage,
            preferences,
        })
    }

    #[must_use]
    pub fn get(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_theme(&mut self, theme: ThemeMode) -> Result<()> {
        self.preferences.theme = theme;
        self.persist()
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        self.preferences.theme = self.preferences.theme.toggled();
        self.persist()?;
        Ok(self.preferences.theme)
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.preferences.language = language;
        self.persist()
    }

    pub fn touch_recent(&mut self, slug: &str) -> Result<()> {
        self.preferences.touch_recent(slug);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        save_snapshot(
            self.storage.as_ref(),
            Namespace::AppPreferences,
            &self.preferences,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_persist_across_reopen() {
        let storage: Arc<dyn SnapshotStorage> =
            Arc::new(crate::storage::MemorySnapshotStorage::default());
        let mut store = PreferencesStore::open(Arc::clone(&storage)).unwrap();
        assert_eq!(store.toggle_theme().unwrap(), ThemeMode::Dark);
        store.set_language(Language::En).unwrap();
        store.touch_recent("jwt-decoder").unwrap();

        let reopened = PreferencesStore::open(storage).unwrap();
        assert_eq!(reopened.get().theme, ThemeMode::Dark);
        assert_eq!(reopened.get().language, Language::En);
        assert_eq!(reopened.get().recent_tools, vec!["jwt-decoder"]);
    }
}
