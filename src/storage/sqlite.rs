//! `SQLite` storage implementation.
//!
//! Provides the catalog record store on a single `SQLite` connection held
//! for the lifetime of the store. Every write runs in its own transaction;
//! every failure is logged with the operation name and its parameters
//! before being returned.

// SQLite stores all integers as i64. Counts are never negative.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::core::{
    Classification, Column, FieldValue, Genre, MediaEntry, MediaType, NewGenre, NewMediaEntry,
    NewMediaType, Record, Table,
};
use crate::error::{Error, IoError, Result, StorageError};
use crate::storage::paging::{Paged, RowMapper};
use crate::storage::schema::{CHECK_SCHEMA_SQL, SCHEMA_SQL, TABLE_COUNT};
use crate::storage::traits::{MediaSummary, Removal, Rows, Storage, WriteOutcome};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Columns matched by a search with no column restriction.
pub const SEARCH_COLUMNS: [Column; 4] = [
    Column::Title,
    Column::Description,
    Column::Genre,
    Column::Notes,
];

/// SQLite-based catalog store.
///
/// # Examples
///
/// ```
/// use media_catalog::core::NewMediaEntry;
/// use media_catalog::storage::{SqliteStorage, Storage};
///
/// let mut storage = SqliteStorage::in_memory().unwrap();
/// storage.init().unwrap();
/// storage.add_entry(&NewMediaEntry::titled("Dune")).unwrap();
/// assert!(storage.entry_by_title("Dune").unwrap().is_some());
/// ```
pub struct SqliteStorage {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Opens or creates a catalog database at the given path.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;

        // journal_mode returns the resulting mode as a row
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        debug!(path = %path.display(), "opened catalog database");

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory catalog database.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the connection.
    ///
    /// Dropping the store also closes it; this reports close failures.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` refuses to close the connection.
    pub fn close(self) -> Result<()> {
        let path = self.path.clone();
        self.conn.close().map_err(|(_, e)| {
            let err = Error::from(StorageError::from(e));
            log_failure("close", &path, &err);
            err
        })
    }

    /// Describes the database and its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be counted.
    pub fn describe(&self) -> Result<String> {
        let location = self
            .path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
        let summary = self.count_by_type()?;
        Ok(format!("Database: {location}\nContaining:\n{summary}."))
    }

    /// Runs a write in its own transaction, logging any failure.
    fn write<T>(
        &mut self,
        op: &'static str,
        params: &dyn Debug,
        f: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        in_transaction(&mut self.conn, f).inspect_err(|e| log_failure(op, params, e))
    }

    /// Runs a read, logging any failure.
    fn read<T>(
        &self,
        op: &'static str,
        params: &dyn Debug,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        f(&self.conn).inspect_err(|e| log_failure(op, params, e))
    }

    /// Validates a column for a stream, logging a rejection.
    fn checked(op: &'static str, table: Table, column: Column) -> Result<Column> {
        table
            .check(column)
            .map_err(Error::from)
            .inspect_err(|e| log_failure(op, &(table, column), e))
    }

    /// Boxes a paged query over this connection.
    fn paged<T: 'static>(
        &self,
        op: &'static str,
        sql: String,
        params: Vec<Value>,
        map: RowMapper<T>,
        page_size: usize,
    ) -> Result<Rows<'_, T>> {
        debug!(op, %sql, ?params, page_size, "streaming query");
        let rows = Paged::new(&self.conn, op, sql, params.clone(), map, page_size)
            .inspect_err(|e| log_failure(op, &(&params, page_size), e))?;
        Ok(Box::new(rows))
    }
}

impl Storage for SqliteStorage {
    fn init(&mut self) -> Result<()> {
        debug!("ensuring catalog schema");
        self.write("init", &(), |tx| {
            tx.execute_batch(SCHEMA_SQL)?;
            Ok(())
        })
    }

    fn is_initialized(&self) -> Result<bool> {
        self.read("is_initialized", &(), |conn| {
            let count: i64 = conn.query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))?;
            Ok(count == TABLE_COUNT)
        })
    }

    // ==================== Media Entries ====================

    fn add_entry(&mut self, entry: &NewMediaEntry) -> Result<i64> {
        debug!(?entry, "add_entry");
        self.write("add_entry", entry, |tx| {
            tx.execute(
                r"
            INSERT INTO media (
                title, description, age_rating, genre, season,
                disc_count, media_type, play_time, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ",
                params![
                    entry.title,
                    entry.description,
                    entry.age_rating,
                    entry.genre,
                    entry.season,
                    entry.disc_count,
                    entry.media_type,
                    entry.play_time,
                    entry.notes,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn update_entry(&mut self, id: i64, entry: &NewMediaEntry) -> Result<WriteOutcome> {
        debug!(id, ?entry, "update_entry");
        self.write("update_entry", &(id, entry), |tx| {
            let affected = tx.execute(
                r"
            UPDATE media SET
                title = ?, description = ?, age_rating = ?, genre = ?,
                season = ?, disc_count = ?, media_type = ?, play_time = ?,
                notes = ?
            WHERE id = ?
        ",
                params![
                    entry.title,
                    entry.description,
                    entry.age_rating,
                    entry.genre,
                    entry.season,
                    entry.disc_count,
                    entry.media_type,
                    entry.play_time,
                    entry.notes,
                    id,
                ],
            )?;
            Ok(WriteOutcome::from_rows(affected))
        })
    }

    fn delete_entry(&mut self, id: i64) -> Result<WriteOutcome> {
        debug!(id, "delete_entry");
        self.write("delete_entry", &id, |tx| {
            let affected = tx.execute("DELETE FROM media WHERE id = ?", params![id])?;
            Ok(WriteOutcome::from_rows(affected))
        })
    }

    // ==================== Classifications ====================

    fn add_genre(&mut self, genre: &NewGenre) -> Result<i64> {
        debug!(?genre, "add_genre");
        self.write("add_genre", genre, |tx| {
            tx.execute(
                "INSERT INTO genres (name, description, examples) VALUES (?, ?, ?)",
                params![genre.name, genre.description, genre.examples],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn update_genre(&mut self, id: i64, genre: &NewGenre) -> Result<WriteOutcome> {
        debug!(id, ?genre, "update_genre");
        self.write("update_genre", &(id, genre), |tx| {
            let affected = tx.execute(
                "UPDATE genres SET name = ?, description = ?, examples = ? WHERE id = ?",
                params![genre.name, genre.description, genre.examples, id],
            )?;
            Ok(WriteOutcome::from_rows(affected))
        })
    }

    fn add_media_type(&mut self, media_type: &NewMediaType) -> Result<i64> {
        debug!(?media_type, "add_media_type");
        self.write("add_media_type", media_type, |tx| {
            tx.execute(
                "INSERT INTO media_types (name) VALUES (?)",
                params![media_type.name],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn update_media_type(&mut self, id: i64, media_type: &NewMediaType) -> Result<WriteOutcome> {
        debug!(id, ?media_type, "update_media_type");
        self.write("update_media_type", &(id, media_type), |tx| {
            let affected = tx.execute(
                "UPDATE media_types SET name = ? WHERE id = ?",
                params![media_type.name, id],
            )?;
            Ok(WriteOutcome::from_rows(affected))
        })
    }

    fn delete_classification(
        &mut self,
        kind: Classification,
        id: i64,
        name: &str,
    ) -> Result<Removal> {
        debug!(%kind, id, name, "delete_classification");
        self.write("delete_classification", &(kind, id, name), |tx| {
            let table = kind.table();
            let stored: Option<Option<String>> = tx
                .query_row(
                    &format!("SELECT name FROM {table} WHERE id = ?"),
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(stored) = stored else {
                return Ok(Removal {
                    entries_rewritten: 0,
                    outcome: WriteOutcome::NotFound,
                });
            };
            let stored = stored.unwrap_or_default();
            if stored != name {
                return Err(StorageError::NameMismatch {
                    table: table.name().to_string(),
                    id,
                    given: name.to_string(),
                    stored,
                }
                .into());
            }

            let entries_rewritten = rewrite_references(tx, kind, name, kind.sentinel())?;
            let removed = tx.execute(&format!("DELETE FROM {table} WHERE id = ?"), params![id])?;
            debug!(%kind, name, entries_rewritten, "rewrote references before delete");

            Ok(Removal {
                entries_rewritten,
                outcome: WriteOutcome::from_rows(removed),
            })
        })
    }

    fn convert_entries(
        &mut self,
        kind: Classification,
        old_value: &str,
        new_value: &str,
    ) -> Result<usize> {
        debug!(%kind, old_value, new_value, "convert_entries");
        self.write("convert_entries", &(kind, old_value, new_value), |tx| {
            Ok(rewrite_references(tx, kind, old_value, new_value)?)
        })
    }

    // ==================== Lookups ====================

    fn exists(&self, table: Table, column: Column, value: &str) -> Result<bool> {
        self.read("exists", &(table, column, value), |conn| {
            let column = table.check(column)?;
            let found: bool = conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {column} = ?)"),
                params![value],
                |row| row.get(0),
            )?;
            if found {
                debug!(%table, %column, value, "exists returned true");
            }
            Ok(found)
        })
    }

    fn find_one(&self, table: Table, column: Column, value: &str) -> Result<Option<Record>> {
        self.read("find_one", &(table, column, value), |conn| {
            let column = table.check(column)?;
            let record = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM {table} WHERE {column} = ? ORDER BY id LIMIT 1",
                        table.column_list()
                    ),
                    params![value],
                    record_mapper(table),
                )
                .optional()?;
            debug!(%table, %column, value, found = record.is_some(), "find_one");
            Ok(record)
        })
    }

    fn count_by_type(&self) -> Result<MediaSummary> {
        self.read("count_by_type", &(), |conn| {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;

            let mut stmt = conn.prepare(
                r"
            SELECT COALESCE(media_type, '') AS kind, COUNT(*)
            FROM media GROUP BY kind ORDER BY kind
        ",
            )?;
            let by_type = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let summary = MediaSummary {
                total: total as usize,
                by_type,
            };
            debug!(%summary, "count_by_type");
            Ok(summary)
        })
    }

    // ==================== Streams ====================

    fn list_values(
        &self,
        table: Table,
        column: Column,
        page_size: usize,
    ) -> Result<Rows<'_, FieldValue>> {
        let column = Self::checked("list_values", table, column)?;
        self.paged(
            "list_values",
            format!("SELECT {column} FROM {table} ORDER BY {column}, id LIMIT ? OFFSET ?"),
            Vec::new(),
            row_to_value,
            page_size,
        )
    }

    fn list_records(&self, table: Table, page_size: usize) -> Result<Rows<'_, Record>> {
        self.paged(
            "list_records",
            format!(
                "SELECT {} FROM {table} ORDER BY id LIMIT ? OFFSET ?",
                table.column_list()
            ),
            Vec::new(),
            record_mapper(table),
            page_size,
        )
    }

    fn list_distinct(
        &self,
        table: Table,
        column: Column,
        page_size: usize,
    ) -> Result<Rows<'_, FieldValue>> {
        let column = Self::checked("list_distinct", table, column)?;
        self.paged(
            "list_distinct",
            format!("SELECT DISTINCT {column} FROM {table} ORDER BY {column} LIMIT ? OFFSET ?"),
            Vec::new(),
            row_to_value,
            page_size,
        )
    }

    fn filter(
        &self,
        table: Table,
        column: Column,
        value: &str,
        page_size: usize,
    ) -> Result<Rows<'_, Record>> {
        let column = Self::checked("filter", table, column)?;
        debug!(%table, %column, value, "filter");
        self.paged(
            "filter",
            format!(
                "SELECT {} FROM {table} WHERE {column} = ? ORDER BY {column}, id LIMIT ? OFFSET ?",
                table.column_list()
            ),
            vec![Value::Text(value.to_string())],
            record_mapper(table),
            page_size,
        )
    }

    fn search(
        &self,
        query: &str,
        column: Option<Column>,
        page_size: usize,
    ) -> Result<Rows<'_, MediaEntry>> {
        let columns: Vec<Column> = match column {
            Some(column) => vec![Self::checked("search", Table::Media, column)?],
            None => SEARCH_COLUMNS.to_vec(),
        };
        debug!(query, ?columns, "search");

        let pattern = like_pattern(query);
        let clause = columns
            .iter()
            .map(|c| format!("{c} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let params = columns
            .iter()
            .map(|_| Value::Text(pattern.clone()))
            .collect();

        self.paged(
            "search",
            format!(
                "SELECT {} FROM media WHERE {clause} ORDER BY title, id LIMIT ? OFFSET ?",
                Table::Media.column_list()
            ),
            params,
            row_to_media,
            page_size,
        )
    }
}

/// Runs `f` inside a transaction, committing only if it succeeds.
fn in_transaction<T>(
    conn: &mut Connection,
    f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
    let tx = conn
        .transaction()
        .map_err(|e| StorageError::Transaction(e.to_string()))?;
    let value = f(&tx)?;
    tx.commit()
        .map_err(|e| StorageError::Transaction(e.to_string()))?;
    Ok(value)
}

/// Rewrites the `kind` reference of every entry from `old_value` to `new_value`.
fn rewrite_references(
    conn: &Connection,
    kind: Classification,
    old_value: &str,
    new_value: &str,
) -> rusqlite::Result<usize> {
    let column = kind.entry_column();
    conn.execute(
        &format!("UPDATE media SET {column} = ? WHERE {column} = ?"),
        params![new_value, old_value],
    )
}

fn log_failure(op: &'static str, params: &dyn Debug, err: &Error) {
    error!(op, params = ?params, error = %err, "storage operation failed");
}

/// Builds a `LIKE` pattern matching `query` literally anywhere in a value.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ==================== Row Mapping ====================

fn text(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn integer(row: &rusqlite::Row<'_>, idx: usize, default: i64) -> rusqlite::Result<i64> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or(default))
}

fn row_to_media(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaEntry> {
    Ok(MediaEntry {
        id: row.get(0)?,
        title: text(row, 1)?,
        description: text(row, 2)?,
        age_rating: text(row, 3)?,
        genre: text(row, 4)?,
        season: integer(row, 5, 0)?,
        disc_count: integer(row, 6, 1)?,
        media_type: text(row, 7)?,
        play_time: integer(row, 8, 0)?,
        notes: text(row, 9)?,
    })
}

fn row_to_genre(row: &rusqlite::Row<'_>) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: row.get(0)?,
        name: text(row, 1)?,
        description: text(row, 2)?,
        examples: text(row, 3)?,
    })
}

fn row_to_media_type(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaType> {
    Ok(MediaType {
        id: row.get(0)?,
        name: text(row, 1)?,
    })
}

fn media_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    row_to_media(row).map(Record::Media)
}

fn genre_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    row_to_genre(row).map(Record::Genre)
}

fn media_type_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    row_to_media_type(row).map(Record::MediaType)
}

/// Row mapper for full rows of `table`; columns in [`Table::columns`] order.
const fn record_mapper(table: Table) -> RowMapper<Record> {
    match table {
        Table::Media => media_record,
        Table::Genres => genre_record,
        Table::MediaTypes => media_type_record,
    }
}

fn row_to_value(row: &rusqlite::Row<'_>) -> rusqlite::Result<FieldValue> {
    Ok(match row.get_ref(0)? {
        ValueRef::Null => FieldValue::Null,
        ValueRef::Integer(i) => FieldValue::Integer(i),
        ValueRef::Real(f) => FieldValue::Text(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            FieldValue::Text(String::from_utf8_lossy(t).into_owned())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DELETED_GENRE, DELETED_MEDIA_TYPE, Selection};
    use crate::storage::traits::Listing;

    fn setup() -> SqliteStorage {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage.init().unwrap();
        storage
    }

    fn titles(rows: Rows<'_, MediaEntry>) -> Vec<String> {
        rows.map(|r| r.unwrap().title).collect()
    }

    #[test]
    fn test_init() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        assert!(!storage.is_initialized().unwrap());
        assert!(storage.init().is_ok());
        assert!(storage.is_initialized().unwrap());
    }

    #[test]
    fn test_init_idempotent() {
        let mut storage = setup();
        storage.add_entry(&NewMediaEntry::titled("Dune")).unwrap();
        assert!(storage.init().is_ok());

        let tables: i64 = storage
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .unwrap();
        assert_eq!(tables, TABLE_COUNT);
        assert!(storage.entry_by_title("Dune").unwrap().is_some());
    }

    #[test]
    fn test_entry_crud() {
        let mut storage = setup();

        let fields = NewMediaEntry::titled("Alien")
            .with_genre("Horror")
            .with_age_rating("18")
            .with_media_type("DVD - Movie")
            .with_play_time(117);
        let id = storage.add_entry(&fields).unwrap();
        assert!(id > 0);

        let loaded = storage.entry_by_title("Alien").unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.fields(), fields);

        let changed = fields.clone().with_notes("Director's cut");
        assert_eq!(
            storage.update_entry(id, &changed).unwrap(),
            WriteOutcome::Applied
        );
        assert_eq!(
            storage.entry_by_title("Alien").unwrap().unwrap().notes,
            "Director's cut"
        );

        assert_eq!(storage.delete_entry(id).unwrap(), WriteOutcome::Applied);
        assert!(storage.entry_by_title("Alien").unwrap().is_none());
        assert_eq!(storage.delete_entry(id).unwrap(), WriteOutcome::NotFound);
    }

    #[test]
    fn test_update_missing_id_changes_nothing() {
        let mut storage = setup();
        let fields = NewMediaEntry::titled("Heat");
        let id = storage.add_entry(&fields).unwrap();

        let outcome = storage
            .update_entry(id + 100, &NewMediaEntry::titled("Changed"))
            .unwrap();
        assert_eq!(outcome, WriteOutcome::NotFound);
        assert_eq!(
            storage.entry_by_title("Heat").unwrap().unwrap().fields(),
            fields
        );
    }

    #[test]
    fn test_genre_and_type_crud() {
        let mut storage = setup();

        let genre_id = storage
            .add_genre(&NewGenre::named("Sci-Fi").with_examples("Dune"))
            .unwrap();
        let type_id = storage
            .add_media_type(&NewMediaType::named("Blu-ray"))
            .unwrap();

        let genre = storage.genre_by_name("Sci-Fi").unwrap().unwrap();
        assert_eq!(genre.id, genre_id);
        assert_eq!(genre.examples, "Dune");

        storage
            .update_genre(genre_id, &NewGenre::named("Science Fiction"))
            .unwrap();
        assert!(storage.genre_by_name("Sci-Fi").unwrap().is_none());
        assert_eq!(
            storage
                .genre_by_name("Science Fiction")
                .unwrap()
                .unwrap()
                .examples,
            ""
        );

        assert_eq!(
            storage
                .update_media_type(type_id, &NewMediaType::named("4K Blu-ray"))
                .unwrap(),
            WriteOutcome::Applied
        );
        assert!(storage.media_type_by_name("4K Blu-ray").unwrap().is_some());
        assert_eq!(
            storage
                .update_media_type(type_id + 1, &NewMediaType::named("VHS"))
                .unwrap(),
            WriteOutcome::NotFound
        );
    }

    #[test]
    fn test_rename_does_not_cascade() {
        let mut storage = setup();
        let genre_id = storage.add_genre(&NewGenre::named("Action")).unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Heat").with_genre("Action"))
            .unwrap();

        storage
            .update_genre(genre_id, &NewGenre::named("Thriller"))
            .unwrap();
        assert_eq!(
            storage.entry_by_title("Heat").unwrap().unwrap().genre,
            "Action"
        );
    }

    #[test]
    fn test_delete_genre_rewrites_entries() {
        let mut storage = setup();
        let action = storage.add_genre(&NewGenre::named("Action")).unwrap();
        storage.add_genre(&NewGenre::named("Drama")).unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Heat").with_genre("Action"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Ronin").with_genre("Action"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Amour").with_genre("Drama"))
            .unwrap();

        let removal = storage
            .delete_classification(Classification::Genre, action, "Action")
            .unwrap();
        assert_eq!(removal.entries_rewritten, 2);
        assert_eq!(removal.outcome, WriteOutcome::Applied);

        assert!(!storage.exists(Table::Media, Column::Genre, "Action").unwrap());
        assert!(!storage.exists(Table::Genres, Column::Name, "Action").unwrap());
        let rewritten: Vec<Record> = storage
            .filter(Table::Media, Column::Genre, DELETED_GENRE, 10)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(rewritten.len(), 2);
        assert_eq!(
            storage.entry_by_title("Amour").unwrap().unwrap().genre,
            "Drama"
        );
    }

    #[test]
    fn test_delete_media_type_rewrites_entries() {
        let mut storage = setup();
        let vhs = storage.add_media_type(&NewMediaType::named("VHS")).unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Tron").with_media_type("VHS"))
            .unwrap();

        let removal = storage
            .delete_classification(Classification::MediaType, vhs, "VHS")
            .unwrap();
        assert_eq!(removal.entries_rewritten, 1);
        assert_eq!(
            storage.entry_by_title("Tron").unwrap().unwrap().media_type,
            DELETED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_delete_missing_classification_rewrites_nothing() {
        let mut storage = setup();
        storage
            .add_entry(&NewMediaEntry::titled("Heat").with_genre("Action"))
            .unwrap();

        let removal = storage
            .delete_classification(Classification::Genre, 42, "Action")
            .unwrap();
        assert_eq!(removal.outcome, WriteOutcome::NotFound);
        assert_eq!(removal.entries_rewritten, 0);
        assert_eq!(
            storage.entry_by_title("Heat").unwrap().unwrap().genre,
            "Action"
        );
    }

    #[test]
    fn test_delete_classification_name_mismatch() {
        let mut storage = setup();
        let id = storage.add_genre(&NewGenre::named("Action")).unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Heat").with_genre("Drama"))
            .unwrap();

        let result = storage.delete_classification(Classification::Genre, id, "Drama");
        assert!(matches!(
            result,
            Err(Error::Storage(StorageError::NameMismatch { .. }))
        ));
        assert!(storage.genre_by_name("Action").unwrap().is_some());
        assert_eq!(
            storage.entry_by_title("Heat").unwrap().unwrap().genre,
            "Drama"
        );
    }

    #[test]
    fn test_delete_classification_rolls_back_on_failure() {
        let mut storage = setup();
        let id = storage.add_genre(&NewGenre::named("Action")).unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Heat").with_genre("Action"))
            .unwrap();
        storage
            .conn
            .execute_batch(
                "CREATE TRIGGER keep_genres BEFORE DELETE ON genres
                 BEGIN SELECT RAISE(ABORT, 'genres are locked'); END;",
            )
            .unwrap();

        let result = storage.delete_classification(Classification::Genre, id, "Action");
        assert!(result.is_err());
        assert_eq!(
            storage.entry_by_title("Heat").unwrap().unwrap().genre,
            "Action"
        );
        assert!(storage.genre_by_name("Action").unwrap().is_some());
    }

    #[test]
    fn test_convert_entries() {
        let mut storage = setup();
        for title in ["Tron", "Akira", "Alien"] {
            storage
                .add_entry(&NewMediaEntry::titled(title).with_media_type("VHS"))
                .unwrap();
        }
        storage
            .add_entry(&NewMediaEntry::titled("Dune").with_media_type("Blu-ray"))
            .unwrap();

        let converted = storage
            .convert_entries(Classification::MediaType, "VHS", "DVD - Movie")
            .unwrap();
        assert_eq!(converted, 3);
        assert!(!storage.exists(Table::Media, Column::MediaType, "VHS").unwrap());
        assert_eq!(
            storage
                .convert_entries(Classification::MediaType, "VHS", "DVD - Movie")
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_exists_and_find_one() {
        let mut storage = setup();
        storage.add_entry(&NewMediaEntry::titled("Dune")).unwrap();

        assert!(storage.exists(Table::Media, Column::Title, "Dune").unwrap());
        assert!(!storage.exists(Table::Media, Column::Title, "dune").unwrap());
        assert!(storage.find_one(Table::Media, Column::Title, "Arrival").unwrap().is_none());

        let record = storage
            .find_one(Table::Media, Column::DiscCount, "1")
            .unwrap()
            .unwrap();
        assert_eq!(record.label(), "Dune");
    }

    #[test]
    fn test_find_one_returns_lowest_id() {
        let mut storage = setup();
        let first = storage
            .add_entry(&NewMediaEntry::titled("Solaris").with_notes("1972"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Solaris").with_notes("2002"))
            .unwrap();

        let record = storage
            .find_one(Table::Media, Column::Title, "Solaris")
            .unwrap()
            .unwrap();
        assert_eq!(record.id(), first);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut storage = setup();
        assert!(matches!(
            storage.exists(Table::Genres, Column::Title, "x"),
            Err(Error::Storage(StorageError::UnknownColumn { .. }))
        ));
        assert!(storage.list_values(Table::MediaTypes, Column::Notes, 10).is_err());
        assert!(storage.filter(Table::Media, Column::Name, "x", 10).is_err());
        assert!(storage.search("x", Some(Column::Examples), 10).is_err());
        // store is still usable
        assert!(storage.add_entry(&NewMediaEntry::titled("Dune")).is_ok());
    }

    #[test]
    fn test_list_values_sorted() {
        let mut storage = setup();
        for title in ["Tron", "Akira", "Memento", "Brazil"] {
            storage.add_entry(&NewMediaEntry::titled(title)).unwrap();
        }

        let values: Vec<String> = storage
            .list_values(Table::Media, Column::Title, 3)
            .unwrap()
            .map(|r| r.unwrap().to_string())
            .collect();
        assert_eq!(values, vec!["Akira", "Brazil", "Memento", "Tron"]);
    }

    #[test]
    fn test_list_all_selection() {
        let mut storage = setup();
        storage.add_media_type(&NewMediaType::named("VHS")).unwrap();
        storage.add_media_type(&NewMediaType::named("Blu-ray")).unwrap();

        let rows: Vec<Listing> = storage
            .list_all(Table::MediaTypes, Selection::All, 1)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert!(matches!(&rows[0], Listing::Record(r) if r.label() == "VHS"));

        let rows: Vec<Listing> = storage
            .list_all(Table::MediaTypes, Selection::Column(Column::Name), 1)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            rows,
            vec![
                Listing::Value(FieldValue::from("Blu-ray")),
                Listing::Value(FieldValue::from("VHS")),
            ]
        );
    }

    #[test]
    fn test_list_distinct() {
        let mut storage = setup();
        for (title, kind) in [("A", "DVD"), ("B", "Blu-ray"), ("C", "DVD"), ("D", "VHS")] {
            storage
                .add_entry(&NewMediaEntry::titled(title).with_media_type(kind))
                .unwrap();
        }

        let values: Vec<FieldValue> = storage
            .list_distinct(Table::Media, Column::MediaType, 2)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            values,
            vec![
                FieldValue::from("Blu-ray"),
                FieldValue::from("DVD"),
                FieldValue::from("VHS"),
            ]
        );
    }

    #[test]
    fn test_filter() {
        let mut storage = setup();
        storage
            .add_entry(&NewMediaEntry::titled("Tron").with_media_type("VHS"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Dune").with_media_type("Blu-ray"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Akira").with_media_type("VHS"))
            .unwrap();

        let labels: Vec<String> = storage
            .filter(Table::Media, Column::MediaType, "VHS", 1000)
            .unwrap()
            .map(|r| r.unwrap().label().to_string())
            .collect();
        assert_eq!(labels, vec!["Tron", "Akira"]);

        let quoted = storage
            .filter(Table::Media, Column::Title, "O'Brien", 10)
            .unwrap()
            .count();
        assert_eq!(quoted, 0);
    }

    #[test]
    fn test_search_all_columns() {
        let mut storage = setup();
        storage
            .add_entry(&NewMediaEntry::titled("Iron Man").with_notes("MARVEL box"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Avengers").with_genre("Marvel"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Blade").with_description("A marvellous film"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Heat").with_age_rating("marvel"))
            .unwrap();

        let found = titles(storage.search("marvel", None, 1000).unwrap());
        assert_eq!(found, vec!["Avengers", "Blade", "Iron Man"]);
    }

    #[test]
    fn test_search_single_column() {
        let mut storage = setup();
        storage
            .add_entry(&NewMediaEntry::titled("Marvel Collection"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Avengers").with_genre("Marvel"))
            .unwrap();

        let found = titles(storage.search("marvel", Some(Column::Title), 10).unwrap());
        assert_eq!(found, vec!["Marvel Collection"]);
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let mut storage = setup();
        storage.add_entry(&NewMediaEntry::titled("100% Wolf")).unwrap();
        storage.add_entry(&NewMediaEntry::titled("1000 Days")).unwrap();
        storage.add_entry(&NewMediaEntry::titled("snake_case")).unwrap();
        storage.add_entry(&NewMediaEntry::titled("snakescase")).unwrap();

        assert_eq!(
            titles(storage.search("100%", None, 10).unwrap()),
            vec!["100% Wolf"]
        );
        assert_eq!(
            titles(storage.search("e_c", None, 10).unwrap()),
            vec!["snake_case"]
        );
    }

    #[test]
    fn test_count_by_type() {
        let mut storage = setup();
        storage
            .add_entry(&NewMediaEntry::titled("Dune").with_media_type("Blu-ray"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Arrival").with_media_type("Blu-ray"))
            .unwrap();
        storage
            .add_entry(&NewMediaEntry::titled("Heat").with_media_type("DVD - Movie"))
            .unwrap();

        let summary = storage.count_by_type().unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.by_type,
            vec![
                ("Blu-ray".to_string(), 2),
                ("DVD - Movie".to_string(), 1),
            ]
        );
        assert_eq!(
            summary.to_string(),
            "Total Media Count: 3 entries\nBlu-ray: 2, DVD - Movie: 1"
        );
    }

    #[test]
    fn test_open_reports_directory_failure() {
        let temp = tempfile::TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let result = SqliteStorage::open(blocker.join("nested").join("catalog.db"));
        assert!(matches!(
            result,
            Err(Error::Io(IoError::DirectoryFailed { .. }))
        ));
    }

    #[test]
    fn test_describe() {
        let storage = setup();
        let text = storage.describe().unwrap();
        assert!(text.starts_with("Database: :memory:\nContaining:\n"));
        assert!(text.ends_with("Total Media Count: 0 entries."));
    }

    #[test]
    fn test_stream_error_surfaces() {
        let storage = setup();
        storage.conn.execute_batch("DROP TABLE genres;").unwrap();
        let mut rows = storage.list_records(Table::Genres, 10).unwrap();
        assert!(matches!(rows.next(), Some(Err(_))));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[test]
    fn test_close() {
        let storage = setup();
        assert!(storage.close().is_ok());
    }
}
