//! Article data structure.

use serde::{Deserialize, Serialize};

/// Sentinel link for results whose title carries no anchor.
///
/// Articles with this link cannot be deduplicated or tracked in history,
/// so they are dropped before delivery.
pub const NO_LINK: &str = "No Link";

/// Sentinel attribution when the byline element is missing.
pub const NO_ATTRIBUTION: &str = "unavailable";

/// Default period token when no year pattern is found in the attribution.
pub const UNDATED: &str = "undated";

/// One search result scraped from the listing.
///
/// Immutable once extracted; the link is the canonical identity used for
/// dedup and delivery history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    /// Result title text (may be empty if the title element had no text)
    pub title: String,

    /// Canonical URL, or [`NO_LINK`]
    pub link: String,

    /// Author/venue/date byline, or [`NO_ATTRIBUTION`]
    pub attribution: String,

    /// Best-effort "YEAR [MONTH]" token, or [`UNDATED`]
    pub period: String,
}

impl Article {
    /// Whether this article carries a real, identifying link.
    pub fn has_link(&self) -> bool {
        self.link != NO_LINK
    }

    /// Render the article as one notification body block.
    pub fn to_block(&self) -> String {
        format!(
            "[ {} ]\n{}\n{}\n{}",
            self.period, self.title, self.attribution, self.link
        )
    }
}
