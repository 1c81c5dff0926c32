//! Storage layer for the media catalog.
//!
//! Provides persistent storage for media entries, genres and media types
//! using `SQLite`. Writes are transactional; multi-row reads are streamed
//! a page at a time.

pub mod paging;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use paging::{Paged, RowMapper};
pub use schema::SCHEMA_SQL;
pub use sqlite::{SEARCH_COLUMNS, SqliteStorage};
pub use traits::{Listing, MediaSummary, Removal, Rows, Storage, WriteOutcome};

/// Default database path, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "Media-Database.db";

/// Default number of rows fetched per page by streaming reads.
pub const DEFAULT_PAGE_SIZE: usize = 1000;
