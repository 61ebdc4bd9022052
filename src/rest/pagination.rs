//! Exhaustive pagination of list endpoints.
//!
//! The [`Paginator`] drives a [`PageCursor`] through a collection, one
//! logical request per page, and concatenates the rows in fetch order.
//! Each page request goes through the retrying transport; the loop itself
//! never retries.
//!
//! A collection is addressed either by a path relative to the base URL or by
//! an absolute follow-link from a response. A follow-link's own query string
//! is dropped before `limit` and `offset` are appended.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::clients::{RequestTarget, RestClient, RestError};
use crate::config::MAX_PAGE_SIZE;
use crate::rest::ListEntity;

/// Position of a pagination run within one collection.
///
/// The offset advances by the number of rows actually returned, not by the
/// page size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageCursor {
    target: RequestTarget,
    params: Vec<(String, String)>,
    limit: u32,
    offset: u64,
}

impl PageCursor {
    /// Starts a cursor over a path relative to the base URL.
    #[must_use]
    pub fn by_path(path: impl Into<String>, limit: u32) -> Self {
        Self::new(RequestTarget::Path(path.into()), limit)
    }

    /// Starts a cursor over an absolute follow-link.
    ///
    /// Any query string on `link` is stripped.
    #[must_use]
    pub fn by_link(link: &str, limit: u32) -> Self {
        let base = link.split_once('?').map_or(link, |(base, _)| base);
        Self::new(RequestTarget::Link(base.to_string()), limit)
    }

    fn new(target: RequestTarget, limit: u32) -> Self {
        Self {
            target,
            params: Vec::new(),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            offset: 0,
        }
    }

    /// Adds caller parameters sent before `limit` and `offset` on every page.
    #[must_use]
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Returns the target being paginated.
    #[must_use]
    pub const fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the offset of the next page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the query parameters for the next page.
    #[must_use]
    pub fn page_params(&self) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("offset".to_string(), self.offset.to_string()));
        params
    }

    /// Records a fetched page and returns `true` if another page is needed.
    ///
    /// Stops on an empty page, or once `offset + rows >= total`.
    pub fn advance(&mut self, rows: usize, total: u64) -> bool {
        let rows = u64::try_from(rows).unwrap_or(u64::MAX);
        if rows == 0 || self.offset.saturating_add(rows) >= total {
            return false;
        }
        self.offset += rows;
        true
    }
}

/// Fetches every row of a collection.
///
/// # Example
///
/// ```rust,ignore
/// use moysklad_api::rest::Paginator;
///
/// let paginator = Paginator::new(&rest_client, 1000);
/// let products: Vec<serde_json::Value> = paginator
///     .fetch_all_by_path("entity/product", Vec::new(), &cancel)
///     .await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    client: &'a RestClient,
    page_size: u32,
}

impl<'a> Paginator<'a> {
    /// Creates a paginator using `page_size` rows per request.
    #[must_use]
    pub const fn new(client: &'a RestClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetches all rows under `path`, sending `params` with every page.
    ///
    /// # Errors
    ///
    /// Returns the first [`RestError`] raised by a page request.
    pub async fn fetch_all_by_path<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, RestError> {
        let cursor = PageCursor::by_path(path, self.page_size).with_params(params);
        self.fetch_all(cursor, cancel).await
    }

    /// Fetches all rows behind an absolute follow-link.
    ///
    /// # Errors
    ///
    /// Returns the first [`RestError`] raised by a page request.
    pub async fn fetch_all_by_link<T: DeserializeOwned>(
        &self,
        link: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, RestError> {
        self.fetch_all(PageCursor::by_link(link, self.page_size), cancel)
            .await
    }

    /// Runs `cursor` to completion.
    ///
    /// At least one page is always requested. Rows are returned in fetch
    /// order without re-sorting.
    ///
    /// # Errors
    ///
    /// Returns the first [`RestError`] raised by a page request.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        mut cursor: PageCursor,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, RestError> {
        let mut all = Vec::new();
        loop {
            let page: ListEntity<T> = self
                .client
                .get(cursor.target().clone(), &cursor.page_params(), cancel)
                .await?;

            let total = page.total_size();
            let rows = page.into_rows();
            let fetched = rows.len();
            all.extend(rows);

            if !cursor.advance(fetched, total) {
                return Ok(all);
            }
        }
    }
}
