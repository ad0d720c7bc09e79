//! Pagination types and traits
//!
//! Defines the page-fetch contract shared by both traversal drivers.

use crate::error::Result;
use std::future::Future;

/// One page of a paginated listing
///
/// `total` is the server's count for the whole collection, not for this
/// page, and may differ between two pages of the same traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items of this page, in server order
    pub items: Vec<T>,
    /// Total count reported for the whole collection
    pub total: u64,
}

impl<T> Page<T> {
    /// Create a page from its items and the reported total
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if this page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tracks one traversal: created at call start, dropped at call end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingState {
    /// Page number of the last recorded page (1-based)
    pub page_no: u32,
    /// Items seen so far across all pages
    pub accumulated: u64,
    /// Last total reported by the server
    pub total: u64,
}

impl Default for PagingState {
    fn default() -> Self {
        Self {
            page_no: 1,
            accumulated: 0,
            total: 0,
        }
    }
}

impl PagingState {
    /// Create a fresh traversal state positioned on page 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page and report whether paging should continue
    ///
    /// Continues only while the last-seen total exceeds the accumulated
    /// count. An empty page also stops the traversal so a server that keeps
    /// reporting a stale total cannot spin the loop forever.
    pub fn record(&mut self, page_no: u32, items: usize, total: u64) -> bool {
        self.page_no = page_no;
        self.accumulated += items as u64;
        self.total = total;
        items > 0 && self.has_more()
    }

    /// Items still expected according to the last-seen total
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.accumulated)
    }

    /// Whether the last-seen total still exceeds the accumulated count
    pub fn has_more(&self) -> bool {
        self.remaining() > 0
    }
}

/// Capability that fetches one page and reports whether to keep paging
///
/// The driver only interprets the returned `Result<bool>`; everything else
/// (the REST call, accumulation, rendering) happens inside the fetcher.
pub trait PageFetcher {
    /// Fetch page `page_no` (1-based) of size `page_size`
    fn fetch(&mut self, page_no: u32, page_size: u32) -> impl Future<Output = Result<bool>>;
}

impl<F, Fut> PageFetcher for F
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    fn fetch(&mut self, page_no: u32, page_size: u32) -> impl Future<Output = Result<bool>> {
        self(page_no, page_size)
    }
}
