// src/pipeline/compose.rs

//! Notification composition.

use chrono::NaiveDate;

use crate::models::Article;

/// Body text when a run finds nothing new.
pub const EMPTY_BODY: &str = "No new articles.";

/// A composed notification, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Render the new-article set into one notification.
///
/// Pure: the subject carries the run date and count; the body is either the
/// fixed empty-set text or one block per article, in order, separated by
/// blank lines.
pub fn compose(run_date: NaiveDate, new_articles: &[Article]) -> Notification {
    let subject = format!(
        "[Scholar] {} new articles ({})",
        run_date.format("%Y-%m-%d"),
        new_articles.len()
    );

    let body = if new_articles.is_empty() {
        EMPTY_BODY.to_string()
    } else {
        new_articles
            .iter()
            .map(Article::to_block)
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    Notification { subject, body }
}
