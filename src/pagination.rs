// sentire - CLI for the Sentry API
// Copyright (C) 2024 Mathias Uhl <mathiasuhl@gmx.de>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::num::NonZeroUsize;

use tracing::{debug, warn};

use crate::client::PaginationInfo;
use crate::error::Result;

/// One page of a listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<PaginationInfo>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: PaginationInfo) -> Self {
        Self {
            items,
            pagination: Some(pagination),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Follow `next` cursors until the server reports no further results.
    pub fetch_all: bool,
    /// Stop after this many pages even if more are available. `None` never
    /// stops early, so a server that always reports another page is
    /// followed indefinitely.
    pub max_pages: Option<NonZeroUsize>,
}

impl PageOptions {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn all(max_pages: Option<NonZeroUsize>) -> Self {
        Self {
            fetch_all: true,
            max_pages,
        }
    }
}

/// Fetch the first page (no cursor) and, when `fetch_all` is set, keep
/// following `next_cursor` while `has_next` holds.
///
/// Items are returned in page order, then in-page order. Any error aborts
/// the whole collection and discards pages already fetched.
pub fn collect_pages<T, F>(mut fetch: F, options: PageOptions) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(cursor.as_deref())?;
        pages += 1;
        debug!(page = pages, items = page.items.len(), cursor = ?cursor, "fetched page");
        items.extend(page.items);

        if !options.fetch_all {
            break;
        }
        let Some(pagination) = page.pagination else {
            break;
        };
        if !pagination.has_next {
            break;
        }
        if let Some(max) = options.max_pages
            && pages >= max.get()
        {
            warn!(
                pages,
                next_cursor = %pagination.next_cursor,
                "page limit reached; more results are available"
            );
            break;
        }
        cursor = Some(pagination.next_cursor);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn next(cursor: &str) -> PaginationInfo {
        PaginationInfo {
            next_cursor: cursor.to_string(),
            has_next: true,
            ..PaginationInfo::default()
        }
    }

    fn last() -> PaginationInfo {
        PaginationInfo {
            next_cursor: "0:300:0".to_string(),
            has_next: false,
            ..PaginationInfo::default()
        }
    }

    #[test]
    fn concatenates_pages_in_fetch_order() {
        let mut seen = Vec::new();
        let items = collect_pages(
            |cursor| {
                seen.push(cursor.map(str::to_string));
                Ok(match cursor {
                    None => Page::new(vec![3, 1], next("c1")),
                    Some("c1") => Page::new(vec![2, 3], next("c2")),
                    Some("c2") => Page::new(vec![0], last()),
                    Some(other) => panic!("unexpected cursor {other}"),
                })
            },
            PageOptions::all(None),
        )
        .unwrap();

        assert_eq!(items, vec![3, 1, 2, 3, 0]);
        assert_eq!(
            seen,
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[test]
    fn single_page_when_not_fetching_all() {
        let mut calls = 0;
        let items = collect_pages(
            |_| {
                calls += 1;
                Ok(Page::new(vec!["a", "b"], next("c1")))
            },
            PageOptions::single(),
        )
        .unwrap();

        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn stops_without_pagination_info() {
        let mut calls = 0;
        let items = collect_pages(
            |_| {
                calls += 1;
                Ok(Page {
                    items: vec![1],
                    pagination: None,
                })
            },
            PageOptions::all(None),
        )
        .unwrap();

        assert_eq!(items, vec![1]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn has_next_false_stops_even_with_cursor() {
        let mut calls = 0;
        collect_pages(
            |_| {
                calls += 1;
                Ok(Page::new(vec![1], last()))
            },
            PageOptions::all(None),
        )
        .unwrap();

        assert_eq!(calls, 1);
    }

    #[test]
    fn error_discards_accumulated_pages() {
        let result: Result<Vec<i32>> = collect_pages(
            |cursor| match cursor {
                None => Ok(Page::new(vec![1, 2], next("c1"))),
                Some(_) => Err(Error::Api {
                    status: 500,
                    body: "boom".into(),
                }),
            },
            PageOptions::all(None),
        );

        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
    }

    #[test]
    fn max_pages_caps_an_endless_cursor_chain() {
        let mut calls = 0;
        let items = collect_pages(
            |_| {
                calls += 1;
                Ok(Page::new(vec![calls], next(&format!("c{calls}"))))
            },
            PageOptions::all(NonZeroUsize::new(3)),
        )
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(calls, 3);
    }
}
