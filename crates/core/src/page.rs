//! Offset paging shared by every list endpoint
//!
//! List endpoints differ in parameter names (`offset`, `vidOffset`, `after`)
//! and response keys (`has-more`, `hasMore`, `paging.next.after`), but all
//! reduce to the same shape: a request [`Page`] and a [`PageResponse`]
//! carrying the offset of the next page.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Position and size of a requested page.
///
/// `count == 0` lets the endpoint pick its default page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Endpoint-specific offset or cursor; 0 for the first page
    pub offset: i64,
    /// Requested page size; 0 for the endpoint default
    pub count: usize,
}

impl Page {
    /// Page at `offset` holding up to `count` elements
    pub fn new(offset: i64, count: usize) -> Self {
        Page { offset, count }
    }

    /// First page with the endpoint's default size
    pub fn first() -> Self {
        Page::default()
    }

    /// Page continuing at `offset` with the default size
    pub fn at(offset: i64) -> Self {
        Page { offset, count: 0 }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    /// Decoded elements
    pub data: Vec<T>,
    /// Offset of the next page; only meaningful when `has_more`
    pub offset: i64,
    /// Whether another page follows
    pub has_more: bool,
}

impl<T> PageResponse<T> {
    /// Final page with no data
    pub fn empty() -> Self {
        PageResponse {
            data: Vec::new(),
            offset: 0,
            has_more: false,
        }
    }

    /// Page after this one, if the endpoint reported more data
    pub fn next_page(&self) -> Option<Page> {
        self.has_more.then(|| Page::at(self.offset))
    }

    /// Convert every element, keeping the paging state
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            offset: self.offset,
            has_more: self.has_more,
        }
    }
}

impl<T> Default for PageResponse<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Walk pages until `predicate` matches an element.
///
/// `fetch` is called with `None` for the first page and then with the page
/// reported by the previous response. Returns the first matching element,
/// or `None` once a page without `has_more` has been scanned. Errors from
/// either closure abort the walk.
pub fn find_in_pages<T, F, P>(mut fetch: F, mut predicate: P) -> Result<Option<T>>
where
    F: FnMut(Option<&Page>) -> Result<PageResponse<T>>,
    P: FnMut(&T) -> Result<bool>,
{
    let mut page: Option<Page> = None;

    loop {
        let response = fetch(page.as_ref())?;
        let next = response.next_page();

        for item in response.data {
            if predicate(&item)? {
                return Ok(Some(item));
            }
        }

        match next {
            Some(next) => page = Some(next),
            None => return Ok(None),
        }
    }
}
