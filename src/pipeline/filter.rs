// src/pipeline/filter.rs

//! Cross-run novelty filtering.

use std::collections::HashSet;

use crate::models::Article;

/// The ordered subsequence of `articles` whose link has never been delivered.
///
/// Pure and deterministic; membership is exact string equality on the link.
pub fn filter_new(articles: &[Article], delivered: &HashSet<String>) -> Vec<Article> {
    articles
        .iter()
        .filter(|article| !delivered.contains(&article.link))
        .cloned()
        .collect()
}
