//! Storage trait definition.
//!
//! Defines the record-store interface the CLI (or any other front end)
//! programs against, plus the small result types it returns.

use crate::core::{
    Classification, Column, FieldValue, Genre, MediaEntry, MediaType, NewGenre, NewMediaEntry,
    NewMediaType, Record, Selection, Table,
};
use crate::error::Result;
use serde::Serialize;
use std::fmt;

/// Lazy stream of rows borrowed from a store.
pub type Rows<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Result of an update or delete addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// A row with that id existed and was changed.
    Applied,
    /// No row had that id; nothing changed.
    NotFound,
}

impl WriteOutcome {
    /// Builds an outcome from an affected-row count.
    #[must_use]
    pub const fn from_rows(affected: usize) -> Self {
        if affected == 0 {
            Self::NotFound
        } else {
            Self::Applied
        }
    }

    /// Returns true if a row was changed.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Report from deleting a genre or media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Removal {
    /// Entries whose reference was rewritten to the sentinel.
    pub entries_rewritten: usize,
    /// Whether the classification row itself was removed.
    pub outcome: WriteOutcome,
}

/// Entry totals by media type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaSummary {
    /// Number of media entries.
    pub total: usize,
    /// Entry count for each distinct media type, ordered by type name.
    pub by_type: Vec<(String, usize)>,
}

impl fmt::Display for MediaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total Media Count: {} entries", self.total)?;
        if !self.by_type.is_empty() {
            let parts = self
                .by_type
                .iter()
                .map(|(name, count)| {
                    let name = if name.is_empty() { "Unspecified" } else { name };
                    format!("{name}: {count}")
                })
                .collect::<Vec<_>>();
            write!(f, "\n{}", parts.join(", "))?;
        }
        Ok(())
    }
}

/// One item of [`Storage::list_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    /// A whole row.
    Record(Record),
    /// A single column value.
    Value(FieldValue),
}

/// Trait for the catalog record store.
///
/// Mutating operations run in a single transaction each, so a failure
/// leaves the store unchanged. Streaming reads borrow the store, which
/// keeps writes out while a stream is alive.
pub trait Storage {
    /// Creates the catalog tables if they do not exist.
    ///
    /// Idempotent - safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    fn init(&mut self) -> Result<()>;

    /// Checks whether all catalog tables exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    fn is_initialized(&self) -> Result<bool>;

    // ==================== Media Entries ====================

    /// Inserts a media entry and returns its new id.
    ///
    /// Does not check title uniqueness; callers use [`Storage::exists`].
    fn add_entry(&mut self, entry: &NewMediaEntry) -> Result<i64>;

    /// Replaces every field of the entry with `id`.
    fn update_entry(&mut self, id: i64, entry: &NewMediaEntry) -> Result<WriteOutcome>;

    /// Deletes the entry with `id`.
    fn delete_entry(&mut self, id: i64) -> Result<WriteOutcome>;

    // ==================== Classifications ====================

    /// Inserts a genre and returns its new id.
    fn add_genre(&mut self, genre: &NewGenre) -> Result<i64>;

    /// Replaces every field of the genre with `id`.
    ///
    /// Renaming does not touch entries that reference the old name; use
    /// [`Storage::convert_entries`] for that.
    fn update_genre(&mut self, id: i64, genre: &NewGenre) -> Result<WriteOutcome>;

    /// Inserts a media type and returns its new id.
    fn add_media_type(&mut self, media_type: &NewMediaType) -> Result<i64>;

    /// Replaces the name of the media type with `id`.
    fn update_media_type(&mut self, id: i64, media_type: &NewMediaType) -> Result<WriteOutcome>;

    /// Deletes a genre or media type.
    ///
    /// In one transaction, every entry referencing `name` is rewritten to
    /// the kind's sentinel and then the row `id` is removed.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if `name` is not the name stored
    /// for `id`, or if either step fails.
    fn delete_classification(
        &mut self,
        kind: Classification,
        id: i64,
        name: &str,
    ) -> Result<Removal>;

    /// Rewrites every entry whose `kind` reference equals `old_value` to
    /// `new_value`. Returns the number of entries changed.
    fn convert_entries(
        &mut self,
        kind: Classification,
        old_value: &str,
        new_value: &str,
    ) -> Result<usize>;

    // ==================== Lookups ====================

    /// Returns true if at least one row of `table` has `column == value`.
    fn exists(&self, table: Table, column: Column, value: &str) -> Result<bool>;

    /// Returns the first row (lowest id) with `column == value`.
    fn find_one(&self, table: Table, column: Column, value: &str) -> Result<Option<Record>>;

    /// Counts entries, in total and per media type.
    fn count_by_type(&self) -> Result<MediaSummary>;

    // ==================== Streams ====================

    /// Streams one column of every row, ordered by that column.
    fn list_values(
        &self,
        table: Table,
        column: Column,
        page_size: usize,
    ) -> Result<Rows<'_, FieldValue>>;

    /// Streams every row, ordered by id.
    fn list_records(&self, table: Table, page_size: usize) -> Result<Rows<'_, Record>>;

    /// Streams the distinct values of one column, ordered ascending.
    fn list_distinct(
        &self,
        table: Table,
        column: Column,
        page_size: usize,
    ) -> Result<Rows<'_, FieldValue>>;

    /// Streams the rows with `column == value`, ordered by `column`.
    fn filter(
        &self,
        table: Table,
        column: Column,
        value: &str,
        page_size: usize,
    ) -> Result<Rows<'_, Record>>;

    /// Streams media entries containing `query` (case-insensitive).
    ///
    /// With no column, title, description, genre and notes are searched.
    fn search(
        &self,
        query: &str,
        column: Option<Column>,
        page_size: usize,
    ) -> Result<Rows<'_, MediaEntry>>;

    // ==================== Provided ====================

    /// Streams a column, or whole rows for [`Selection::All`].
    fn list_all(
        &self,
        table: Table,
        selection: Selection,
        page_size: usize,
    ) -> Result<Rows<'_, Listing>> {
        Ok(match selection {
            Selection::All => Box::new(
                self.list_records(table, page_size)?
                    .map(|r| r.map(Listing::Record)),
            ),
            Selection::Column(column) => Box::new(
                self.list_values(table, column, page_size)?
                    .map(|r| r.map(Listing::Value)),
            ),
        })
    }

    /// Looks up a media entry by title.
    fn entry_by_title(&self, title: &str) -> Result<Option<MediaEntry>> {
        Ok(self
            .find_one(Table::Media, Column::Title, title)?
            .and_then(Record::into_media))
    }

    /// Looks up a genre by name.
    fn genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        Ok(self
            .find_one(Table::Genres, Column::Name, name)?
            .and_then(Record::into_genre))
    }

    /// Looks up a media type by name.
    fn media_type_by_name(&self, name: &str) -> Result<Option<MediaType>> {
        Ok(self
            .find_one(Table::MediaTypes, Column::Name, name)?
            .and_then(Record::into_media_type))
    }
}
