//! Genres and media types.
//!
//! Both are classification values that media entries point at by name.
//! [`Classification`] ties each kind to its table, the entry column that
//! references it, and the sentinel written into entries when it is
//! deleted.

use crate::core::table::{Column, Table};
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder written into entries whose genre was deleted.
pub const DELETED_GENRE: &str = "-DELETED GENRE-";

/// Placeholder written into entries whose media type was deleted.
pub const DELETED_MEDIA_TYPE: &str = "-DELETED MEDIA TYPE-";

/// A genre row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Identifier assigned by the storage layer.
    pub id: i64,
    /// Genre name, referenced by `MediaEntry::genre`.
    pub name: String,
    /// What the genre covers.
    pub description: String,
    /// Example titles.
    pub examples: String,
}

/// The writable fields of a genre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGenre {
    /// Genre name.
    pub name: String,
    /// What the genre covers.
    pub description: String,
    /// Example titles.
    pub examples: String,
}

impl NewGenre {
    /// Creates genre fields with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the examples.
    #[must_use]
    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = examples.into();
        self
    }
}

/// A media type row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    /// Identifier assigned by the storage layer.
    pub id: i64,
    /// Media type name, referenced by `MediaEntry::media_type`.
    pub name: String,
}

/// The writable fields of a media type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMediaType {
    /// Media type name.
    pub name: String,
}

impl NewMediaType {
    /// Creates media type fields.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Kind of classification a media entry can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Genres table, referenced by the `genre` column.
    Genre,
    /// Media types table, referenced by the `media_type` column.
    MediaType,
}

impl Classification {
    /// Table holding the classification rows.
    #[must_use]
    pub const fn table(self) -> Table {
        match self {
            Self::Genre => Table::Genres,
            Self::MediaType => Table::MediaTypes,
        }
    }

    /// Column of the media table that references this classification.
    #[must_use]
    pub const fn entry_column(self) -> Column {
        match self {
            Self::Genre => Column::Genre,
            Self::MediaType => Column::MediaType,
        }
    }

    /// Value written into referencing entries when a row is deleted.
    #[must_use]
    pub const fn sentinel(self) -> &'static str {
        match self {
            Self::Genre => DELETED_GENRE,
            Self::MediaType => DELETED_MEDIA_TYPE,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::MediaType => "media type",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Classification {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "genre" | "genres" => Ok(Self::Genre),
            "type" | "types" | "media_type" | "media-type" | "media_types" | "media-types" => {
                Ok(Self::MediaType)
            }
            _ => Err(StorageError::UnknownTable {
                name: s.to_string(),
            }),
        }
    }
}
