//! Fixed-size pagination over the upstream match list.
//!
//! [`PageNumber`] is a 1-indexed page newtype; [`MatchPage`] is one
//! [`PAGE_SIZE`]-item slice of the full collection together with the
//! totals a client needs to detect the last page. The server pages raw
//! upstream JSON (`MatchPage<Value>`); clients page typed [`Match`]es.

use std::fmt;
use std::num::NonZeroU32;

use super::Match;

/// Number of matches per page.
pub const PAGE_SIZE: usize = 9;

/// A 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Creates a page number, returning `None` for `0`.
    #[must_use]
    pub const fn new(page: u32) -> Option<Self> {
        match NonZeroU32::new(page) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Parses a raw `page` query value.
    ///
    /// Leading whitespace is skipped and the leading run of ASCII digits is
    /// read, so `"2abc"` is page 2. Missing, empty, non-numeric, zero and
    /// negative values resolve to page 1. Digit runs that overflow `u32`
    /// saturate to `u32::MAX`.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::FIRST;
        };
        let raw = raw.trim_start();
        let raw = raw.strip_prefix('+').unwrap_or(raw);
        let digits_end = raw
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len());
        let Some(digits) = raw.get(..digits_end).filter(|d| !d.is_empty()) else {
            return Self::FIRST;
        };
        let value = digits.parse::<u32>().unwrap_or(u32::MAX);
        Self::new(value).unwrap_or(Self::FIRST)
    }

    /// Returns the raw page number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the following page, saturating at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn start_index(self) -> usize {
        (self.get() as usize - 1).saturating_mul(PAGE_SIZE)
    }

    /// One past the index of the last item on this page.
    #[must_use]
    pub fn end_index(self) -> usize {
        (self.get() as usize).saturating_mul(PAGE_SIZE)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PageNumber> for u32 {
    fn from(page: PageNumber) -> Self {
        page.get()
    }
}

/// Number of pages needed for `total` items.
#[must_use]
pub const fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// One page of matches plus pagination totals.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPage<T = Match> {
    /// The requested page.
    pub page: PageNumber,
    /// Number of matches in the whole collection.
    pub total: usize,
    /// Number of pages in the whole collection.
    pub total_pages: usize,
    /// The matches on this page, in upstream order.
    pub matches: Vec<T>,
}

impl<T: Clone> MatchPage<T> {
    /// Cuts `page` out of the full collection. Items are cloned as-is.
    ///
    /// Pages past the end are empty rather than an error.
    #[must_use]
    pub fn slice(all: &[T], page: PageNumber) -> Self {
        let matches = all
            .iter()
            .skip(page.start_index())
            .take(page.end_index() - page.start_index())
            .cloned()
            .collect();
        Self {
            page,
            total: all.len(),
            total_pages: total_pages(all.len()),
            matches,
        }
    }

    /// Whether this is the final page worth requesting.
    ///
    /// An empty page, or a page number at or beyond `total_pages`, ends
    /// the sequence.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.matches.is_empty() || self.page.get() as usize >= self.total_pages
    }

    /// Converts every item, keeping page and totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> MatchPage<U> {
        MatchPage {
            page: self.page,
            total: self.total,
            total_pages: self.total_pages,
            matches: self.matches.into_iter().map(f).collect(),
        }
    }
}
