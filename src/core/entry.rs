//! Media entries.
//!
//! A media entry describes one owned item (a film, a box set season, an
//! album). Its `genre` and `media_type` fields are soft references: they
//! hold the *name* of a genre or media type rather than a row id.

use serde::{Deserialize, Serialize};

/// A media entry as stored in the catalog.
///
/// # Examples
///
/// ```
/// use media_catalog::core::NewMediaEntry;
///
/// let fields = NewMediaEntry::titled("Dune").with_media_type("Blu-ray");
/// let entry = fields.clone().with_id(7);
/// assert_eq!(entry.id, 7);
/// assert_eq!(entry.fields(), fields);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    /// Identifier assigned by the storage layer.
    pub id: i64,

    /// Title. Required and non-empty.
    pub title: String,

    /// Free-form description.
    pub description: String,

    /// Age rating, kept as text because of ratings like "PG" or "U".
    pub age_rating: String,

    /// Name of the genre this entry belongs to.
    pub genre: String,

    /// Season number, 0 when not applicable.
    pub season: i64,

    /// Number of discs in the item.
    pub disc_count: i64,

    /// Name of the media type (e.g. "DVD - Movie").
    pub media_type: String,

    /// Running time in minutes.
    pub play_time: i64,

    /// Free-form notes.
    pub notes: String,
}

/// The writable fields of a media entry.
///
/// Used for both inserts and full-row updates; every field is always
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMediaEntry {
    /// Title. Required and non-empty.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Age rating.
    pub age_rating: String,
    /// Genre name.
    pub genre: String,
    /// Season number.
    pub season: i64,
    /// Number of discs.
    pub disc_count: i64,
    /// Media type name.
    pub media_type: String,
    /// Running time in minutes.
    pub play_time: i64,
    /// Free-form notes.
    pub notes: String,
}

impl Default for NewMediaEntry {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            age_rating: String::new(),
            genre: String::new(),
            season: 0,
            disc_count: 1,
            media_type: String::new(),
            play_time: 0,
            notes: String::new(),
        }
    }
}

impl NewMediaEntry {
    /// Creates entry fields with a title and every other field defaulted.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the age rating.
    #[must_use]
    pub fn with_age_rating(mut self, age_rating: impl Into<String>) -> Self {
        self.age_rating = age_rating.into();
        self
    }

    /// Sets the genre name.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// Sets the season number.
    #[must_use]
    pub const fn with_season(mut self, season: i64) -> Self {
        self.season = season;
        self
    }

    /// Sets the disc count.
    #[must_use]
    pub const fn with_disc_count(mut self, disc_count: i64) -> Self {
        self.disc_count = disc_count;
        self
    }

    /// Sets the media type name.
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Sets the running time in minutes.
    #[must_use]
    pub const fn with_play_time(mut self, play_time: i64) -> Self {
        self.play_time = play_time;
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Attaches a storage id, producing a stored entry.
    #[must_use]
    pub fn with_id(self, id: i64) -> MediaEntry {
        MediaEntry {
            id,
            title: self.title,
            description: self.description,
            age_rating: self.age_rating,
            genre: self.genre,
            season: self.season,
            disc_count: self.disc_count,
            media_type: self.media_type,
            play_time: self.play_time,
            notes: self.notes,
        }
    }
}

impl MediaEntry {
    /// Returns the writable fields of this entry.
    #[must_use]
    pub fn fields(&self) -> NewMediaEntry {
        NewMediaEntry {
            title: self.title.clone(),
            description: self.description.clone(),
            age_rating: self.age_rating.clone(),
            genre: self.genre.clone(),
            season: self.season,
            disc_count: self.disc_count,
            media_type: self.media_type.clone(),
            play_time: self.play_time,
            notes: self.notes.clone(),
        }
    }
}
