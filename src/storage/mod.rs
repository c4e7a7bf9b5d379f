//! Storage for cross-run state.
//!
//! The delivery history is the only state that outlives a run. It lives in a
//! plain text file, one delivered link per line:
//!
//! ```text
//! https://example.com/paper/1
//! https://example.com/paper/2
//! ```
//!
//! Loading reads the whole file into a set; committing strictly appends.

pub mod history;

pub use history::HistoryStore;
