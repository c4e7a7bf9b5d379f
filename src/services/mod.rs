//! Service layer for the scholar watcher.
//!
//! This module contains:
//! - Results-page fetching and pagination (`PageSource`, `ScholarClient`, `PageFetcher`)
//! - Record extraction (`extract`)
//! - Notification delivery (`Notifier`, `SmtpNotifier`)

pub mod extract;
mod mailer;
mod scholar;

pub use mailer::{Notifier, SmtpNotifier};
pub use scholar::{FetchBatch, PageFetcher, PageSource, SCHOLAR_BASE, ScholarClient};
