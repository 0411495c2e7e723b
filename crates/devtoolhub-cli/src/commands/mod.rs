pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod convert;
pub mod cron;
pub mod encode;
pub mod favorites;
pub mod history;
pub mod json;
pub mod jwt;
pub mod mock;
pub mod password;
pub mod regex;
pub mod timestamp;
pub mod tools_cmd;
pub mod url;
pub mod uuid;
pub mod vault;
