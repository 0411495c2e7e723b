//! Data models for DevToolHub

mod favorite;
mod history;
mod password;
mod preferences;
mod tool;

pub use favorite::FavoriteRecord;
pub use history::{HistoryEntry, HistoryRecord};
pub use password::{EntryId, PasswordEntry, PasswordRecord};
pub use preferences::{Language, Preferences, ThemeMode};
pub use tool::Tool;
