//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::core::{Classification, Column, NewMediaEntry, Selection, Table};
use crate::storage::DEFAULT_PAGE_SIZE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Media catalog: a personal catalog of DVDs, Blu-rays and other media.
///
/// Keeps media entries, genres and media types in a single `SQLite` file.
#[derive(Parser, Debug)]
#[command(name = "media-catalog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the catalog database file.
    ///
    /// Defaults to `Media-Database.db` in the current directory.
    #[arg(short, long, env = "MEDIA_CATALOG_DB")]
    pub db_path: Option<PathBuf>,

    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the catalog database.
    ///
    /// Creates the database file and tables if they don't exist.
    Init,

    /// Show the database path and entry counts per media type.
    Summary,

    /// Add a media entry.
    Add(EntryArgs),

    /// Replace every field of a media entry.
    Update {
        /// Entry ID.
        id: i64,

        /// New field values.
        #[command(flatten)]
        fields: EntryArgs,
    },

    /// Delete a media entry.
    #[command(alias = "rm")]
    Delete {
        /// Entry ID.
        id: i64,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Manage genres.
    Genre {
        /// Genre action.
        #[command(subcommand)]
        action: GenreCommands,
    },

    /// Manage media types.
    #[command(name = "type")]
    MediaType {
        /// Media type action.
        #[command(subcommand)]
        action: TypeCommands,
    },

    /// List a column, or whole rows, of a table.
    #[command(alias = "ls")]
    List {
        /// Table to list (media, genres, types).
        #[arg(short, long, default_value = "media")]
        table: Table,

        /// Column to list; omit or use `*` for whole rows.
        #[arg(short, long)]
        column: Option<Selection>,

        /// Only list distinct values of the column.
        #[arg(short, long, requires = "column")]
        distinct: bool,

        /// Rows fetched per query.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    /// List rows whose column equals a value.
    Filter {
        /// Table to filter.
        table: Table,

        /// Column to compare.
        column: Column,

        /// Value to match exactly.
        value: String,

        /// Rows fetched per query.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    /// Search media entries for a substring (case-insensitive).
    Search {
        /// Text to look for.
        query: String,

        /// Only search this column (default: title, description, genre, notes).
        #[arg(short, long)]
        column: Option<Column>,

        /// Rows fetched per query.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    /// Show a media entry by title.
    Show {
        /// Exact title.
        title: String,
    },

    /// Reassign every entry from one genre or media type to another.
    Convert {
        /// What to convert (genre, type).
        kind: Classification,

        /// Current value.
        from: String,

        /// Replacement value.
        to: String,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Fields of a media entry.
#[derive(Args, Debug, Clone)]
pub struct EntryArgs {
    /// Title.
    pub title: String,

    /// Short description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Age rating (e.g. PG, 12, 15).
    #[arg(long, default_value = "")]
    pub age_rating: String,

    /// Genre name.
    #[arg(short, long, default_value = "")]
    pub genre: String,

    /// Season number (0 for none).
    #[arg(long, default_value_t = 0)]
    pub season: i64,

    /// Number of discs.
    #[arg(long, default_value_t = 1)]
    pub disc_count: i64,

    /// Media type name.
    #[arg(short = 't', long, default_value = "")]
    pub media_type: String,

    /// Play time in minutes.
    #[arg(long, default_value_t = 0)]
    pub play_time: i64,

    /// Free-form notes.
    #[arg(short, long, default_value = "")]
    pub notes: String,
}

impl EntryArgs {
    /// Converts the arguments into entry fields.
    #[must_use]
    pub fn to_entry(&self) -> NewMediaEntry {
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

/// Genre subcommands.
#[derive(Subcommand, Debug)]
pub enum GenreCommands {
    /// Add a genre.
    Add {
        /// Genre name.
        name: String,

        /// Short description.
        #[arg(long, default_value = "")]
        description: String,

        /// Example titles.
        #[arg(long, default_value = "")]
        examples: String,
    },

    /// Replace every field of a genre. Entries keep the old name.
    Update {
        /// Genre ID.
        id: i64,

        /// New name.
        name: String,

        /// New description.
        #[arg(long, default_value = "")]
        description: String,

        /// New example titles.
        #[arg(long, default_value = "")]
        examples: String,
    },

    /// Delete a genre, marking its entries as deleted-genre.
    Delete {
        /// Genre ID.
        id: i64,

        /// Genre name, which must match the stored one.
        name: String,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all genres.
    List {
        /// Rows fetched per query.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
}

/// Media type subcommands.
#[derive(Subcommand, Debug)]
pub enum TypeCommands {
    /// Add a media type.
    Add {
        /// Media type name.
        name: String,
    },

    /// Rename a media type. Entries keep the old name.
    Update {
        /// Media type ID.
        id: i64,

        /// New name.
        name: String,
    },

    /// Delete a media type, marking its entries as deleted-type.
    Delete {
        /// Media type ID.
        id: i64,

        /// Media type name, which must match the stored one.
        name: String,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all media types.
    List {
        /// Rows fetched per query.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}
