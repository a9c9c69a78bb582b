//! Page-number pagination primitives shared by backend endpoints.
//!
//! A listing endpoint accepts a 1-based page number, asks its repository for
//! one page of records plus the total count, and wraps the result in a
//! [`Paginated`] envelope so templates can render prev/next controls without
//! re-deriving arithmetic.

use serde::{Deserialize, Serialize};

/// Errors raised while interpreting pagination input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are 1-based; zero is not addressable.
    #[error("page numbers start at 1")]
    ZeroPage,
}

/// A validated, 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Validate a raw page number.
    pub fn new(raw: u32) -> Result<Self, PaginationError> {
        if raw == 0 {
            return Err(PaginationError::ZeroPage);
        }
        Ok(Self(raw))
    }

    /// Interpret optional query input, defaulting absent values to page 1.
    ///
    /// Out-of-range input is a user-recoverable mistake, so zero also clamps
    /// to the first page rather than erroring.
    pub fn from_query(raw: Option<u32>) -> Self {
        raw.and_then(|value| Self::new(value).ok())
            .unwrap_or(Self::FIRST)
    }

    /// The underlying 1-based value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Row offset of this page for a given page size.
    pub fn offset(self, per_page: u32) -> i64 {
        i64::from(self.0 - 1) * i64::from(per_page)
    }
}

/// A single page of records plus the bookkeeping templates need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Records on this page, in listing order.
    pub items: Vec<T>,
    /// The page these records belong to.
    pub page: PageNumber,
    /// Page size the listing was computed with.
    pub per_page: u32,
    /// Total records across all pages.
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Assemble an envelope from one page of records and the total count.
    pub fn new(items: Vec<T>, page: PageNumber, per_page: u32, total: u64) -> Self {
        Self {
            items,
            page,
            per_page,
            total,
        }
    }

    /// Number of pages needed for `total` records, never less than 1.
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 || self.per_page == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.page.get() > 1
    }

    /// Whether a further page exists.
    pub fn has_next(&self) -> bool {
        self.page.get() < self.total_pages()
    }

    /// Map the records while keeping the envelope bookkeeping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}
