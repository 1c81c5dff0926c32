//! Page-at-a-time row streaming.
//!
//! [`Paged`] runs the same `SELECT` repeatedly with `LIMIT ? OFFSET ?`
//! appended to its parameters, buffering one page at a time. Each page is
//! fetched through its own prepared statement which is finalized before the
//! page is handed out, so no cursor stays open between pages and dropping
//! the iterator early releases nothing but the buffered rows.

use crate::error::{Error, Result, StorageError};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};

/// Maps one result row to an output item.
pub type RowMapper<T> = fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>;

/// Lazy, single-pass iterator over a paged query.
///
/// Yields `Ok` items in query order. If fetching a page fails, the error is
/// yielded once and the iterator ends.
pub struct Paged<'a, T> {
    conn: &'a Connection,
    op: &'static str,
    sql: String,
    params: Vec<Value>,
    map: RowMapper<T>,
    page_size: usize,
    limit: i64,
    offset: usize,
    page: std::vec::IntoIter<T>,
    exhausted: bool,
    pages_fetched: usize,
    largest_page: usize,
}

impl<'a, T> Paged<'a, T> {
    /// Creates a paged query.
    ///
    /// `sql` must end with `LIMIT ? OFFSET ?` and use unnumbered `?`
    /// placeholders for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `page_size` is zero or does not fit a
    /// `SQLite` integer.
    pub fn new(
        conn: &'a Connection,
        op: &'static str,
        sql: String,
        params: Vec<Value>,
        map: RowMapper<T>,
        page_size: usize,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::Config {
                message: "page size must be at least 1".to_string(),
            });
        }
        let limit = i64::try_from(page_size).map_err(|_| Error::Config {
            message: format!("page size must be at most {}", i64::MAX),
        })?;

        Ok(Self {
            conn,
            op,
            sql,
            params,
            map,
            page_size,
            limit,
            offset: 0,
            page: Vec::new().into_iter(),
            exhausted: false,
            pages_fetched: 0,
            largest_page: 0,
        })
    }

    /// Number of pages fetched so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Largest number of rows returned by a single fetch.
    #[must_use]
    pub const fn largest_page(&self) -> usize {
        self.largest_page
    }

    // The offset counts rows already read, so it stays below i64::MAX.
    #[allow(clippy::cast_possible_wrap)]
    fn fetch_page(&self) -> Result<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare(&self.sql)
            .map_err(StorageError::from)?;

        let bounds = [
            Value::Integer(self.limit),
            Value::Integer(self.offset as i64),
        ];
        let params = self.params.iter().cloned().chain(bounds);

        let rows = stmt
            .query_map(params_from_iter(params), self.map)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(rows)
    }
}

impl<T> Iterator for Paged<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.page.next() {
            return Some(Ok(item));
        }
        if self.exhausted {
            return None;
        }

        match self.fetch_page() {
            Ok(rows) => {
                self.pages_fetched += 1;
                self.largest_page = self.largest_page.max(rows.len());
                self.offset += rows.len();
                if rows.len() < self.page_size {
                    self.exhausted = true;
                }
                self.page = rows.into_iter();
                self.page.next().map(Ok)
            }
            Err(e) => {
                self.exhausted = true;
                tracing::error!(
                    op = self.op,
                    sql = %self.sql,
                    params = ?self.params,
                    offset = self.offset,
                    error = %e,
                    "page fetch failed"
                );
                Some(Err(e))
            }
        }
    }
}
