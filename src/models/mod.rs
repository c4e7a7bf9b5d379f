// src/models/mod.rs

//! Domain models for the scholar watcher.

mod article;
mod config;

// Re-export all public types
pub use article::{Article, NO_ATTRIBUTION, NO_LINK, UNDATED};
pub use config::{Config, FetchConfig, HistoryConfig, MailConfig, SearchConfig};
