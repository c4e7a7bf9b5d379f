// src/services/scholar.rs

//! Results-page source and pagination.
//!
//! [`PageSource`] is the narrow seam to the external listing: one raw HTML
//! page per (query, offset). [`ScholarClient`] implements it over HTTP and
//! maps automated-traffic interstitials to a distinct error. [`PageFetcher`]
//! drives offsets until the listing is exhausted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Article, FetchConfig, SearchConfig};
use crate::services::extract;

/// Base URL of the results listing.
pub const SCHOLAR_BASE: &str = "https://scholar.google.com/scholar";

/// Markers that identify an anti-automation interstitial instead of results.
const BLOCK_MARKERS: &[&str] = &[
    "gs_captcha",
    "not a robot",
    "unusual traffic",
    "automated queries",
];

/// Provider of raw results pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the raw HTML of one results page for the query at the given
    /// zero-based result offset.
    async fn fetch_page(&self, query: &str, offset: u32) -> Result<String>;
}

/// HTTP implementation of [`PageSource`].
pub struct ScholarClient {
    client: Client,
    search: SearchConfig,
}

impl ScholarClient {
    /// Create a client with the configured user agent and timeout.
    pub fn new(search: SearchConfig, fetch: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&fetch.user_agent)
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()?;

        Ok(Self { client, search })
    }

    fn page_url(&self, query: &str, offset: u32) -> Result<Url> {
        let mut url = Url::parse(SCHOLAR_BASE)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("hl", &self.search.language)
                .append_pair("as_sdt", "0,5");
            if let Some(year) = self.search.year_from {
                pairs.append_pair("as_ylo", &year.to_string());
            }
            pairs
                .append_pair("filter", "0")
                .append_pair("start", &offset.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl PageSource for ScholarClient {
    async fn fetch_page(&self, query: &str, offset: u32) -> Result<String> {
        let url = self.page_url(query, offset)?;
        log::debug!("Fetching results page: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.as_u16() == 429 || status.as_u16() == 403 {
            return Err(AppError::blocked(offset, format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(AppError::page(offset, format!("HTTP {status}")));
        }

        let html = response.text().await?;
        if let Some(marker) = detect_block(&html) {
            return Err(AppError::blocked(offset, marker));
        }

        Ok(html)
    }
}

fn detect_block(html: &str) -> Option<&'static str> {
    BLOCK_MARKERS.iter().copied().find(|m| html.contains(m))
}

/// What a page's raw result count means for pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageDisposition {
    /// No results at all; the previous page was the last one
    EmptyStop,
    /// Final partial page; keep its results and stop
    PartialStop,
    /// Full page; keep going
    Continue,
}

fn disposition(raw_count: usize, stride: usize) -> PageDisposition {
    if raw_count == 0 {
        PageDisposition::EmptyStop
    } else if raw_count < stride {
        PageDisposition::PartialStop
    } else {
        PageDisposition::Continue
    }
}

/// Everything accumulated by one full pagination run, before dedup.
#[derive(Debug, Default)]
pub struct FetchBatch {
    /// Extracted articles in fetch order
    pub articles: Vec<Article>,
    /// Pages that contributed results
    pub pages: usize,
    /// Raw result units seen, including skipped ones
    pub raw_total: usize,
    /// Units skipped by the extractor
    pub skipped: usize,
}

/// Drives pagination against a [`PageSource`] until exhaustion.
pub struct PageFetcher {
    stride: usize,
    page_delay: Duration,
}

impl PageFetcher {
    pub fn new(fetch: &FetchConfig) -> Self {
        Self {
            stride: fetch.page_size,
            page_delay: Duration::from_millis(fetch.page_delay_ms),
        }
    }

    /// Fetch and extract every results page for the query.
    ///
    /// Any page failure aborts the whole batch; a truncated batch would
    /// under-report and the missing items would never be retried.
    pub async fn fetch_all(&self, source: &dyn PageSource, query: &str) -> Result<FetchBatch> {
        let base = Url::parse(SCHOLAR_BASE)?;
        let mut batch = FetchBatch::default();
        let mut offset: u32 = 0;

        loop {
            let html = source.fetch_page(query, offset).await?;
            let extraction = extract::parse_page(&html, &base);
            let page_state = disposition(extraction.raw_count, self.stride);

            if page_state == PageDisposition::EmptyStop {
                log::debug!("No results at offset {}, listing exhausted", offset);
                break;
            }

            log::debug!(
                "Offset {}: {} results ({} skipped)",
                offset,
                extraction.raw_count,
                extraction.skipped
            );
            batch.pages += 1;
            batch.raw_total += extraction.raw_count;
            batch.skipped += extraction.skipped;
            batch.articles.extend(extraction.articles);

            if page_state == PageDisposition::PartialStop {
                log::debug!("Partial page at offset {}, listing exhausted", offset);
                break;
            }

            offset += self.stride as u32;

            // Mandatory pause: the source blocks clients that page too fast,
            // which would kill the whole run.
            tokio::time::sleep(self.page_delay).await;
        }

        Ok(batch)
    }
}
