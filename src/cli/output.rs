//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{FieldValue, Genre, MediaEntry, MediaType, Record, Table};
use crate::error::Error;
use crate::storage::{Listing, MediaSummary, Removal, WriteOutcome};
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats the database summary.
///
/// Text output is the store's own description.
#[must_use]
pub fn format_summary(
    description: &str,
    database: &str,
    summary: &MediaSummary,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format!("{description}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct SummaryOutput<'a> {
                database: &'a str,
                summary: &'a MediaSummary,
            }
            format_json(&SummaryOutput { database, summary })
        }
    }
}

/// Formats a single media entry.
#[must_use]
pub fn format_entry(entry: &MediaEntry, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_entry_text(entry),
        OutputFormat::Json => format_json(entry),
    }
}

fn format_entry_text(entry: &MediaEntry) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Title: {}", entry.title);
    let _ = writeln!(output, "  ID:          {}", entry.id);
    let fields = [
        ("Description", &entry.description),
        ("Age rating", &entry.age_rating),
        ("Genre", &entry.genre),
        ("Media type", &entry.media_type),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            let _ = writeln!(output, "  {:<12} {value}", format!("{label}:"));
        }
    }
    if entry.season > 0 {
        let _ = writeln!(output, "  Season:      {}", entry.season);
    }
    let _ = writeln!(output, "  Discs:       {}", entry.disc_count);
    if entry.play_time > 0 {
        let _ = writeln!(output, "  Play time:   {} min", entry.play_time);
    }
    if !entry.notes.is_empty() {
        let _ = writeln!(output, "  Notes:       {}", entry.notes);
    }
    output
}

/// Formats a list of media entries.
#[must_use]
pub fn format_entries(entries: &[MediaEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_entries_text(entries),
        OutputFormat::Json => format_json(&entries),
    }
}

fn format_entries_text(entries: &[MediaEntry]) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<6} {:<30} {:<16} {:<16} Rating",
        "ID", "Title", "Genre", "Type"
    );
    output.push_str(&"-".repeat(78));
    output.push('\n');

    for entry in entries {
        let _ = writeln!(
            output,
            "{:<6} {:<30} {:<16} {:<16} {}",
            entry.id,
            truncate(&entry.title, 30),
            truncate(&entry.genre, 16),
            truncate(&entry.media_type, 16),
            entry.age_rating
        );
    }
    let _ = writeln!(output, "\n{} entries", entries.len());

    output
}

/// Formats a list of full rows from one table.
#[must_use]
pub fn format_records(table: Table, records: &[Record], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(&records),
        OutputFormat::Text => {
            if records.is_empty() {
                return format!("No rows found in {table}.\n");
            }
            match table {
                Table::Media => {
                    let entries: Vec<MediaEntry> =
                        records.iter().cloned().filter_map(Record::into_media).collect();
                    format_entries_text(&entries)
                }
                Table::Genres => {
                    let genres: Vec<Genre> =
                        records.iter().cloned().filter_map(Record::into_genre).collect();
                    format_genres_text(&genres)
                }
                Table::MediaTypes => {
                    let types: Vec<MediaType> = records
                        .iter()
                        .cloned()
                        .filter_map(Record::into_media_type)
                        .collect();
                    format_media_types_text(&types)
                }
            }
        }
    }
}

fn format_genres_text(genres: &[Genre]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{:<6} {:<20} {:<30} Examples", "ID", "Name", "Description");
    output.push_str(&"-".repeat(78));
    output.push('\n');
    for genre in genres {
        let _ = writeln!(
            output,
            "{:<6} {:<20} {:<30} {}",
            genre.id,
            truncate(&genre.name, 20),
            truncate(&genre.description, 30),
            truncate(&genre.examples, 20)
        );
    }
    output
}

fn format_media_types_text(types: &[MediaType]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{:<6} Name", "ID");
    output.push_str(&"-".repeat(30));
    output.push('\n');
    for media_type in types {
        let _ = writeln!(output, "{:<6} {}", media_type.id, media_type.name);
    }
    output
}

/// Formats a list of column values, one per line.
#[must_use]
pub fn format_values(values: &[FieldValue], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(&values),
        OutputFormat::Text => {
            let mut output = String::new();
            for value in values {
                let _ = writeln!(output, "{value}");
            }
            output
        }
    }
}

/// Formats the result of `list_all`.
#[must_use]
pub fn format_listing(table: Table, items: Vec<Listing>, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format_json(&items);
    }

    let mut records = Vec::new();
    let mut values = Vec::new();
    for item in items {
        match item {
            Listing::Record(record) => records.push(record),
            Listing::Value(value) => values.push(value),
        }
    }
    if values.is_empty() {
        format_records(table, &records, format)
    } else {
        format_values(&values, format)
    }
}

/// Formats the result of an insert.
#[must_use]
pub fn format_added(what: &str, name: &str, id: i64, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("Added {what} '{name}' (ID: {id})\n"),
        OutputFormat::Json => format_json(&serde_json::json!({
            "added": what,
            "name": name,
            "id": id,
        })),
    }
}

/// Formats the result of an update or delete addressed by id.
#[must_use]
pub fn format_outcome(
    action: &str,
    what: &str,
    id: i64,
    outcome: WriteOutcome,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => match outcome {
            WriteOutcome::Applied => format!("{action} {what} {id}\n"),
            WriteOutcome::NotFound => format!("No {what} with ID {id}; nothing changed.\n"),
        },
        OutputFormat::Json => format_json(&serde_json::json!({
            "action": action.to_lowercase(),
            "table": what,
            "id": id,
            "outcome": outcome,
        })),
    }
}

/// Formats the result of deleting a genre or media type.
#[must_use]
pub fn format_removal(what: &str, name: &str, removal: Removal, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => match removal.outcome {
            WriteOutcome::Applied => format!(
                "Deleted {what} '{name}'; {} entries marked as deleted\n",
                removal.entries_rewritten
            ),
            WriteOutcome::NotFound => format!("No {what} named '{name}' with that ID.\n"),
        },
        OutputFormat::Json => format_json(&removal),
    }
}

/// Formats the result of converting entries.
#[must_use]
pub fn format_converted(what: &str, from: &str, to: &str, count: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("Converted {count} entries from {what} '{from}' to '{to}'\n"),
        OutputFormat::Json => format_json(&serde_json::json!({
            "kind": what,
            "from": from,
            "to": to,
            "converted": count,
        })),
    }
}

/// Formats an error for output.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({
            "error": error.to_string(),
        })),
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).map_or_else(|_| "{}".to_string(), |s| s + "\n")
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
