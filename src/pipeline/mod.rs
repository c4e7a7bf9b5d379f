//! Pipeline stages for one ingestion run.
//!
//! - `dedup`: distinct non-sentinel links, first occurrence wins
//! - `filter`: drop links already delivered in prior runs
//! - `compose`: render the new-article set into a notification
//! - `run`: sequence the whole run, committing history only after dispatch

pub mod compose;
pub mod dedup;
pub mod filter;
pub mod run;

pub use compose::{EMPTY_BODY, Notification, compose};
pub use dedup::dedup;
pub use filter::filter_new;
pub use run::{RunError, RunPhase, RunReport, run};
