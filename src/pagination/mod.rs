//! Pagination module
//!
//! Page-number traversal of the platform's listing endpoints.
//!
//! # Overview
//!
//! Every listing endpoint answers `pageNo`/`pageSize` requests with one page
//! of items plus the total size of the collection. A [`PageFetcher`] wraps one
//! such request and reports whether to keep going; the drivers decide nothing
//! else:
//!
//! - [`paging_all`] fetches pages 1, 2, 3, ... until the fetcher says stop
//! - [`paging_view`] does the same, but in interactive mode asks the operator
//!   between pages and stops quietly on a "no"
//!
//! [`collect_all`] and [`view_all`] adapt closures returning whole [`Page`]s
//! to the fetcher contract, tracking the running count in a [`PagingState`].

mod confirm;
mod driver;
mod types;

pub use confirm::{Confirm, PromptConfirm};
pub use driver::{
    collect_all, paging_all, paging_view, view_all, Collector, Viewer,
    DEFAULT_COLLECT_PAGE_SIZE,
};
pub use types::{Page, PageFetcher, PagingState};
