//! Table and column identifiers.
//!
//! Generic operations (listing, filtering, lookups) take a [`Table`] and a
//! [`Column`] instead of raw strings. Only the identifiers enumerated here
//! can ever reach a SQL statement, and [`Table::check`] rejects columns
//! that do not belong to the table.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Media entries.
    Media,
    /// Genres.
    Genres,
    /// Media types.
    MediaTypes,
}

const MEDIA_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Title,
    Column::Description,
    Column::AgeRating,
    Column::Genre,
    Column::Season,
    Column::DiscCount,
    Column::MediaType,
    Column::PlayTime,
    Column::Notes,
];

const GENRE_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Name,
    Column::Description,
    Column::Examples,
];

const MEDIA_TYPE_COLUMNS: &[Column] = &[Column::Id, Column::Name];

impl Table {
    /// Every table, in creation order.
    pub const ALL: [Self; 3] = [Self::MediaTypes, Self::Genres, Self::Media];

    /// SQL name of the table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Genres => "genres",
            Self::MediaTypes => "media_types",
        }
    }

    /// Columns of the table, in storage order.
    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Media => MEDIA_COLUMNS,
            Self::Genres => GENRE_COLUMNS,
            Self::MediaTypes => MEDIA_TYPE_COLUMNS,
        }
    }

    /// Returns true if `column` belongs to this table.
    #[must_use]
    pub fn has_column(self, column: Column) -> bool {
        self.columns().contains(&column)
    }

    /// Returns `column` if it belongs to this table.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnknownColumn`] otherwise.
    pub fn check(self, column: Column) -> Result<Column, StorageError> {
        if self.has_column(column) {
            Ok(column)
        } else {
            Err(StorageError::UnknownColumn {
                table: self.name().to_string(),
                column: column.name().to_string(),
            })
        }
    }

    /// Comma separated column list for `SELECT` statements.
    #[must_use]
    pub fn column_list(self) -> String {
        self.columns()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "media" | "entries" => Ok(Self::Media),
            "genres" | "genre" => Ok(Self::Genres),
            "media_types" | "media_type" | "types" | "type" => Ok(Self::MediaTypes),
            _ => Err(StorageError::UnknownTable {
                name: s.to_string(),
            }),
        }
    }
}

/// A column of one of the catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Row id (all tables).
    Id,
    /// Entry title.
    Title,
    /// Entry or genre description.
    Description,
    /// Entry age rating.
    AgeRating,
    /// Entry genre reference.
    Genre,
    /// Entry season number.
    Season,
    /// Entry disc count.
    DiscCount,
    /// Entry media type reference.
    MediaType,
    /// Entry running time.
    PlayTime,
    /// Entry notes.
    Notes,
    /// Genre or media type name.
    Name,
    /// Genre examples.
    Examples,
}

impl Column {
    /// SQL name of the column.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::AgeRating => "age_rating",
            Self::Genre => "genre",
            Self::Season => "season",
            Self::DiscCount => "disc_count",
            Self::MediaType => "media_type",
            Self::PlayTime => "play_time",
            Self::Notes => "notes",
            Self::Name => "name",
            Self::Examples => "examples",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column = match s.to_lowercase().replace('-', "_").as_str() {
            "id" => Self::Id,
            "title" => Self::Title,
            "description" => Self::Description,
            "age_rating" => Self::AgeRating,
            "genre" => Self::Genre,
            "season" => Self::Season,
            "disc_count" => Self::DiscCount,
            "media_type" => Self::MediaType,
            "play_time" => Self::PlayTime,
            "notes" => Self::Notes,
            "name" => Self::Name,
            "examples" => Self::Examples,
            _ => {
                return Err(StorageError::UnknownColumn {
                    table: "*".to_string(),
                    column: s.to_string(),
                });
            }
        };
        Ok(column)
    }
}

/// What a listing returns: one column, or whole rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Whole rows, ordered by id.
    All,
    /// A single column, ordered by that column.
    Column(Column),
}

impl From<Column> for Selection {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl FromStr for Selection {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Column)
        }
    }
}
