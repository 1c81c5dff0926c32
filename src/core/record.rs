//! Rows returned by generic queries.

use crate::core::classification::{Genre, MediaType};
use crate::core::entry::MediaEntry;
use crate::core::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A full row from any catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum Record {
    /// A media entry.
    Media(MediaEntry),
    /// A genre.
    Genre(Genre),
    /// A media type.
    MediaType(MediaType),
}

impl Record {
    /// Row id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Media(e) => e.id,
            Self::Genre(g) => g.id,
            Self::MediaType(t) => t.id,
        }
    }

    /// Table the row came from.
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Media(_) => Table::Media,
            Self::Genre(_) => Table::Genres,
            Self::MediaType(_) => Table::MediaTypes,
        }
    }

    /// Title or name, whichever identifies the row to a person.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Media(e) => &e.title,
            Self::Genre(g) => &g.name,
            Self::MediaType(t) => &t.name,
        }
    }

    /// Returns the media entry, if this is one.
    #[must_use]
    pub fn into_media(self) -> Option<MediaEntry> {
        match self {
            Self::Media(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the genre, if this is one.
    #[must_use]
    pub fn into_genre(self) -> Option<Genre> {
        match self {
            Self::Genre(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the media type, if this is one.
    #[must_use]
    pub fn into_media_type(self) -> Option<MediaType> {
        match self {
            Self::MediaType(t) => Some(t),
            _ => None,
        }
    }
}

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// SQL NULL.
    Null,
    /// Integer value.
    Integer(i64),
    /// Text value.
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}
