//! Traversal drivers
//!
//! `paging_all` runs a fetcher to completion; `paging_view` does the same but
//! may pause after every page to ask the operator whether to go on. Both
//! fetch strictly sequentially, one call per page number, without retries.

use super::confirm::Confirm;
use super::types::{Page, PageFetcher, PagingState};
use crate::error::{Error, Result};
use std::future::Future;
use tracing::debug;

/// Page size used when a listing is collected in full
pub const DEFAULT_COLLECT_PAGE_SIZE: u32 = 20;

fn check_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 {
        return Err(Error::InvalidPageSize { page_size });
    }
    Ok(())
}

/// Drive `fetcher` from page 1 until it reports no more pages or fails
///
/// A fetch error is returned unchanged; whatever the fetcher accumulated
/// before the error stays with the caller.
pub async fn paging_all<P: PageFetcher>(fetcher: &mut P, page_size: u32) -> Result<()> {
    check_page_size(page_size)?;

    let mut page_no: u32 = 1;
    loop {
        let has_more = fetcher.fetch(page_no, page_size).await?;
        debug!(page_no, page_size, has_more, "fetched page");
        if !has_more {
            return Ok(());
        }
        page_no += 1;
    }
}

/// Drive `fetcher` page by page, asking `confirm` between pages when
/// `interactive` is set
///
/// A negative answer ends the traversal with `Ok`. Without `interactive` the
/// call sequence is the same as [`paging_all`].
pub async fn paging_view<P, C>(
    fetcher: &mut P,
    confirm: &mut C,
    prompt: &str,
    page_size: u32,
    interactive: bool,
) -> Result<()>
where
    P: PageFetcher,
    C: Confirm + ?Sized,
{
    check_page_size(page_size)?;

    let mut page_no: u32 = 1;
    loop {
        let has_more = fetcher.fetch(page_no, page_size).await?;
        debug!(page_no, page_size, has_more, interactive, "fetched page");
        if !has_more {
            return Ok(());
        }
        if interactive && !confirm.confirm(prompt)? {
            debug!(page_no, "operator stopped paging");
            return Ok(());
        }
        page_no += 1;
    }
}

// ============================================================================
// Page-level adapters
// ============================================================================

/// Fetcher that accumulates every item of every page
///
/// Wraps a closure returning whole [`Page`]s and decides continuation from
/// the accumulated count against the last-seen total.
pub struct Collector<T, F> {
    fetch_page: F,
    state: PagingState,
    items: Vec<T>,
}

impl<T, F> Collector<T, F> {
    /// Create a collector over a page-producing closure
    pub fn new(fetch_page: F) -> Self {
        Self {
            fetch_page,
            state: PagingState::new(),
            items: Vec::new(),
        }
    }

    /// Traversal state after the last recorded page
    pub fn state(&self) -> &PagingState {
        &self.state
    }

    /// Items collected so far
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the collector, returning the collected items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T, F, Fut> PageFetcher for Collector<T, F>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    async fn fetch(&mut self, page_no: u32, page_size: u32) -> Result<bool> {
        let page = (self.fetch_page)(page_no, page_size).await?;
        let has_more = self.state.record(page_no, page.len(), page.total);
        self.items.extend(page.items);
        Ok(has_more)
    }
}

/// Fetcher that hands every page to a render callback instead of keeping it
pub struct Viewer<F, R> {
    fetch_page: F,
    render: R,
    state: PagingState,
}

impl<F, R> Viewer<F, R> {
    /// Create a viewer over a page-producing closure and a renderer
    pub fn new(fetch_page: F, render: R) -> Self {
        Self {
            fetch_page,
            render,
            state: PagingState::new(),
        }
    }

    /// Traversal state after the last rendered page
    pub fn state(&self) -> &PagingState {
        &self.state
    }
}

impl<T, F, Fut, R> PageFetcher for Viewer<F, R>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    R: FnMut(&[T], &PagingState) -> Result<()>,
{
    async fn fetch(&mut self, page_no: u32, page_size: u32) -> Result<bool> {
        let page = (self.fetch_page)(page_no, page_size).await?;
        let has_more = self.state.record(page_no, page.len(), page.total);
        (self.render)(&page.items, &self.state)?;
        Ok(has_more)
    }
}

/// Collect every item of a paginated listing
pub async fn collect_all<T, F, Fut>(fetch_page: F, page_size: u32) -> Result<Vec<T>>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut collector = Collector::new(fetch_page);
    paging_all(&mut collector, page_size).await?;
    debug!(
        items = collector.state().accumulated,
        total = collector.state().total,
        "collected listing"
    );
    Ok(collector.into_items())
}

/// Render a paginated listing page by page, returning the items shown
pub async fn view_all<T, F, Fut, R, C>(
    fetch_page: F,
    render: R,
    confirm: &mut C,
    prompt: &str,
    page_size: u32,
    interactive: bool,
) -> Result<u64>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    R: FnMut(&[T], &PagingState) -> Result<()>,
    C: Confirm + ?Sized,
{
    let mut viewer = Viewer::new(fetch_page, render);
    paging_view(&mut viewer, confirm, prompt, page_size, interactive).await?;
    Ok(viewer.state().accumulated)
}
