//! Post list filtering, search and pagination
//!
//! The listing view consumes an already-built sequence of [`PostSummary`]
//! records and the per-locale tag index, and derives the visible page from
//! its state (search text, selected tag, current page). It performs no I/O
//! and never fails; the one anomaly it recognizes — a URL tag parameter that
//! is not in the active locale's index — is corrected silently.
//!
//! [`PostSummary`]: crate::content::PostSummary

mod query;
mod selection;
mod view;

pub use query::{TagQueryState, UrlReplace, TAG_PARAM};
pub use selection::SelectionStore;
pub use view::{PageView, PostListView};
