//! # Media Catalog
//!
//! Data-access layer and CLI for a personal media catalog.
//!
//! The catalog keeps media entries (films, series, albums), genres and
//! media types in a single `SQLite` file. Entries reference their genre
//! and media type by name; deleting a genre or media type marks the
//! entries that used it instead of deleting them.
//!
//! ## Features
//!
//! - **`SQLite` Storage**: One connection per store, one transaction per write
//! - **Streaming Reads**: Listings, filters and searches fetch a page at a time
//! - **Checked Identifiers**: Tables and columns come from a closed set
//!
//! ## Example
//!
//! ```
//! use media_catalog::{NewMediaEntry, SqliteStorage, Storage};
//!
//! let mut storage = SqliteStorage::in_memory().unwrap();
//! storage.init().unwrap();
//! storage
//!     .add_entry(&NewMediaEntry::titled("Alien").with_media_type("DVD - Movie"))
//!     .unwrap();
//! assert_eq!(storage.count_by_type().unwrap().total, 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod error;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{
    Classification, Column, DELETED_GENRE, DELETED_MEDIA_TYPE, FieldValue, Genre, MediaEntry,
    MediaType, NewGenre, NewMediaEntry, NewMediaType, Record, Selection, Table,
};

// Re-export storage types
pub use storage::{
    DEFAULT_DB_PATH, DEFAULT_PAGE_SIZE, Listing, MediaSummary, Removal, Rows, SqliteStorage,
    Storage, WriteOutcome,
};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
