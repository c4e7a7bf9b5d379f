// src/pipeline/dedup.rs

//! Intra-batch deduplication.

use std::collections::HashSet;

use crate::models::Article;

/// Keep the first occurrence of each distinct link, in fetch order.
///
/// Linkless articles carry the `NO_LINK` sentinel and are always dropped:
/// without an identity they cannot be deduplicated or tracked in history and
/// would be renotified on every run.
pub fn dedup(batch: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for article in batch {
        if !article.has_link() {
            continue;
        }
        if seen.insert(article.link.clone()) {
            unique.push(article);
        }
    }

    unique
}
