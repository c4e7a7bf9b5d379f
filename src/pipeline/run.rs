// src/pipeline/run.rs

//! Run orchestration.
//!
//! One run is a strictly sequential pass through the phases below. No phase
//! is entered twice and nothing is retried within a run; retry is the next
//! scheduled invocation's job. History is committed only after the transport
//! confirmed delivery, so an aborted run leaves every undelivered article
//! eligible for redelivery.

use chrono::Local;
use thiserror::Error;

use crate::error::AppError;
use crate::models::Config;
use crate::pipeline::{compose, dedup, filter_new};
use crate::services::{Notifier, PageFetcher, PageSource};
use crate::storage::HistoryStore;

/// Phases of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Fetching,
    Deduplicating,
    Filtering,
    Composing,
    Dispatching,
    Committing,
    Done,
}

/// A run abort, tagged with the phase it came from.
///
/// The distinction matters downstream: a `Dispatch` abort had a valid new-set
/// computed but must leave history untouched, while a `Commit` abort means
/// articles were delivered but not recorded (the next run may renotify them;
/// that direction is accepted, silent loss is not).
#[derive(Error, Debug)]
pub enum RunError {
    #[error("history load failed: {0}")]
    Load(#[source] AppError),

    #[error("fetch aborted: {0}")]
    Fetch(#[source] AppError),

    #[error("dispatch aborted: {0}")]
    Dispatch(#[source] AppError),

    #[error("history commit failed after dispatch: {0}")]
    Commit(#[source] AppError),
}

/// Summary of a completed run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Raw result units seen across all pages
    pub fetched: usize,
    /// Pages that contributed results
    pub pages: usize,
    /// Units the extractor skipped
    pub skipped: usize,
    /// Batch size after dedup
    pub unique: usize,
    /// Articles delivered this run
    pub new_count: usize,
    /// Subject line of the dispatched notification
    pub subject: String,
}

fn enter(phase: RunPhase) {
    log::debug!("Entering {:?} phase", phase);
}

/// Execute one full run against the given collaborators.
pub async fn run(
    config: &Config,
    source: &dyn PageSource,
    notifier: &dyn Notifier,
    history: &HistoryStore,
) -> std::result::Result<RunReport, RunError> {
    enter(RunPhase::Idle);
    let delivered = history.load().await.map_err(RunError::Load)?;
    log::info!("Loaded {} previously delivered links", delivered.len());

    enter(RunPhase::Fetching);
    let fetcher = PageFetcher::new(&config.fetch);
    let batch = fetcher
        .fetch_all(source, &config.search.query)
        .await
        .map_err(RunError::Fetch)?;
    log::info!(
        "Fetched {} results over {} pages ({} skipped)",
        batch.raw_total,
        batch.pages,
        batch.skipped
    );

    enter(RunPhase::Deduplicating);
    let fetched_count = batch.articles.len();
    let unique = dedup(batch.articles);
    if unique.len() < fetched_count {
        log::info!("Dropped {} duplicate or linkless results", fetched_count - unique.len());
    }

    enter(RunPhase::Filtering);
    let fresh = filter_new(&unique, &delivered);
    log::info!("{} new articles", fresh.len());

    enter(RunPhase::Composing);
    let notification = compose(Local::now().date_naive(), &fresh);

    enter(RunPhase::Dispatching);
    notifier
        .send(&notification.subject, &notification.body)
        .await
        .map_err(RunError::Dispatch)?;
    log::info!("Notification dispatched: {}", notification.subject);

    enter(RunPhase::Committing);
    let links: Vec<String> = fresh.iter().map(|a| a.link.clone()).collect();
    history.append(&links).await.map_err(RunError::Commit)?;
    if !links.is_empty() {
        log::info!("Recorded {} links in {}", links.len(), history.path().display());
    }

    enter(RunPhase::Done);
    Ok(RunReport {
        fetched: batch.raw_total,
        pages: batch.pages,
        skipped: batch.skipped,
        unique: unique.len(),
        new_count: fresh.len(),
        subject: notification.subject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::pipeline::EMPTY_BODY;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn unit(i: usize) -> String {
        format!(
            r#"<div class="gs_ri">
              <h3 class="gs_rt"><a href="https://example.com/p/{i}">Paper {i}</a></h3>
              <div class="gs_a">A Author - Journal, 2025 - example.com</div>
            </div>"#
        )
    }

    /// Serves fixed page sizes with globally distinct links.
    struct FakeSource {
        pages: Vec<String>,
        requests: AtomicUsize,
    }

    impl FakeSource {
        fn with_sizes(sizes: &[usize]) -> Self {
            let mut pages = Vec::new();
            let mut next_id = 0;
            for &size in sizes {
                let units: String = (next_id..next_id + size).map(unit).collect();
                pages.push(format!("<html><body>{units}</body></html>"));
                next_id += size;
            }
            Self {
                pages,
                requests: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageSource for FakeSource {
        async fn fetch_page(&self, _query: &str, offset: u32) -> Result<String> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let index = offset as usize / 10;
            Ok(self
                .pages
                .get(index)
                .cloned()
                .unwrap_or_else(|| "<html><body></body></html>".to_string()))
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl FakeNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn last_body(&self) -> String {
            self.sent.lock().unwrap().last().unwrap().1.clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send(&self, subject: &str, body: &str) -> Result<()> {
            if self.fail {
                return Err(AppError::config("transport rejected the message"));
            }
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.search.query = "biogems".to_string();
        config.fetch.page_delay_ms = 0;
        config
    }

    fn history_in(tmp: &TempDir) -> HistoryStore {
        HistoryStore::new(tmp.path().join("sent.txt"))
    }

    #[tokio::test]
    async fn test_end_to_end_commits_all_new_links() {
        let tmp = TempDir::new().unwrap();
        let history = history_in(&tmp);
        let source = FakeSource::with_sizes(&[10, 10, 3]);
        let notifier = FakeNotifier::default();

        let report = run(&test_config(), &source, &notifier, &history)
            .await
            .unwrap();

        assert_eq!(report.fetched, 23);
        assert_eq!(report.unique, 23);
        assert_eq!(report.new_count, 23);
        assert!(report.subject.ends_with("(23)"));
        assert_eq!(notifier.sent_count(), 1);

        let text = tokio::fs::read_to_string(history.path()).await.unwrap();
        assert_eq!(text.lines().count(), 23);
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_second_identical_run_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let history = history_in(&tmp);
        let source = FakeSource::with_sizes(&[10, 5]);
        let notifier = FakeNotifier::default();
        let config = test_config();

        let first = run(&config, &source, &notifier, &history).await.unwrap();
        assert_eq!(first.new_count, 15);
        let after_first = tokio::fs::read(history.path()).await.unwrap();

        let second = run(&config, &source, &notifier, &history).await.unwrap();
        assert_eq!(second.new_count, 0);

        // Dispatch still happens, carrying the fixed empty-set body
        assert_eq!(notifier.sent_count(), 2);
        assert_eq!(notifier.last_body(), EMPTY_BODY);

        // History is byte-for-byte unchanged by the second commit
        let after_second = tokio::fs::read(history.path()).await.unwrap();
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn test_dispatch_failure_leaves_history_untouched() {
        let tmp = TempDir::new().unwrap();
        let history = history_in(&tmp);
        history
            .append(&["https://example.com/prior".to_string()])
            .await
            .unwrap();
        let before = tokio::fs::read(history.path()).await.unwrap();

        let source = FakeSource::with_sizes(&[4]);
        let notifier = FakeNotifier::failing();

        let result = run(&test_config(), &source, &notifier, &history).await;
        assert!(matches!(result, Err(RunError::Dispatch(_))));

        let after = tokio::fs::read(history.path()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_dispatch() {
        struct BlockedSource;

        #[async_trait]
        impl PageSource for BlockedSource {
            async fn fetch_page(&self, _query: &str, offset: u32) -> Result<String> {
                Err(AppError::blocked(offset, "unusual traffic"))
            }
        }

        let tmp = TempDir::new().unwrap();
        let history = history_in(&tmp);
        let notifier = FakeNotifier::default();

        let result = run(&test_config(), &BlockedSource, &notifier, &history).await;
        assert!(matches!(result, Err(RunError::Fetch(_))));
        assert_eq!(notifier.sent_count(), 0);
        assert!(!history.path().exists());
    }

    #[tokio::test]
    async fn test_prior_history_filters_resurfaced_links() {
        let tmp = TempDir::new().unwrap();
        let history = history_in(&tmp);
        // Links 0..4 were delivered in an earlier run
        let prior: Vec<String> = (0..4).map(|i| format!("https://example.com/p/{i}")).collect();
        history.append(&prior).await.unwrap();

        let source = FakeSource::with_sizes(&[6]);
        let notifier = FakeNotifier::default();

        let report = run(&test_config(), &source, &notifier, &history)
            .await
            .unwrap();

        assert_eq!(report.new_count, 2);
        let set = history.load().await.unwrap();
        assert_eq!(set.len(), 6);
    }
}
