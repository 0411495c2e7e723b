//! devtoolhub-core - Core library for DevToolHub
//!
//! This crate contains the tool catalog and stateless tools, the local-first
//! favorites/history/vault stores with their cloud reconciliation, vault
//! encryption, and the HTTP clients used by every DevToolHub interface.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod models;
pub mod remote;
pub mod storage;
pub mod stores;
pub mod sync;
pub mod tools;
pub mod util;
pub mod vault;

pub use error::{Error, Result};
pub use models::{FavoriteRecord, HistoryEntry, PasswordEntry, PasswordRecord, Tool};
