//! Core domain models for the media catalog.
//!
//! This module contains the data structures shared by the storage layer and
//! the CLI: media entries, genres, media types, and the identifiers used to
//! address tables and columns generically. These are pure domain models
//! with no I/O dependencies.

pub mod classification;
pub mod entry;
pub mod record;
pub mod table;

pub use classification::{
    Classification, DELETED_GENRE, DELETED_MEDIA_TYPE, Genre, MediaType, NewGenre, NewMediaType,
};
pub use entry::{MediaEntry, NewMediaEntry};
pub use record::{FieldValue, Record};
pub use table::{Column, Selection, Table};
