//! Database schema definitions.
//!
//! Contains the SQL for the three catalog tables. Every statement is
//! `IF NOT EXISTS`, so running the schema again is a no-op.

/// SQL schema for database setup.
pub const SCHEMA_SQL: &str = r"
-- Media types (e.g. 'DVD - Movie', 'Blu-ray', 'Audio CD')
CREATE TABLE IF NOT EXISTS media_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT
);

-- Genres with a short description and example titles
CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    description TEXT,
    examples TEXT
);

-- Media entries; genre and media_type hold names, not ids
CREATE TABLE IF NOT EXISTS media (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    age_rating TEXT,
    genre TEXT,
    season INTEGER DEFAULT 0,
    disc_count INTEGER DEFAULT 1,
    media_type TEXT,
    play_time INTEGER DEFAULT 0,
    notes TEXT
);

-- Lookups by natural key and by classification reference
CREATE INDEX IF NOT EXISTS idx_media_title ON media(title);
CREATE INDEX IF NOT EXISTS idx_media_genre ON media(genre);
CREATE INDEX IF NOT EXISTS idx_media_media_type ON media(media_type);
";

/// SQL to count how many catalog tables exist.
pub const CHECK_SCHEMA_SQL: &str = r"
SELECT COUNT(*) FROM sqlite_master
WHERE type='table' AND name IN ('media', 'genres', 'media_types');
";

/// Number of tables created by [`SCHEMA_SQL`].
pub const TABLE_COUNT: i64 = 3;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Table;

    #[test]
    fn test_schema_sql_not_empty() {
        assert!(!SCHEMA_SQL.is_empty());
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS"));
    }

    #[test]
    fn test_schema_covers_every_table() {
        for table in Table::ALL {
            assert!(SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table.name())));
            assert!(CHECK_SCHEMA_SQL.contains(&format!("'{}'", table.name())));
        }
        assert_eq!(TABLE_COUNT, Table::ALL.len() as i64);
    }

    #[test]
    fn test_schema_covers_every_column() {
        for table in Table::ALL {
            for column in table.columns() {
                assert!(SCHEMA_SQL.contains(&format!("    {} ", column.name())));
            }
        }
    }

    #[test]
    fn test_title_required() {
        assert!(SCHEMA_SQL.contains("title TEXT NOT NULL"));
    }
}
