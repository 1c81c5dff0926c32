//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, format_added, format_converted, format_entries, format_entry, format_listing,
    format_outcome, format_records, format_removal, format_summary, format_values,
};
use crate::cli::parser::{Cli, Commands, EntryArgs, GenreCommands, TypeCommands};
use crate::core::{Classification, Column, NewGenre, NewMediaEntry, NewMediaType, Selection, Table};
use crate::error::{CommandError, Result, StorageError};
use crate::storage::{SqliteStorage, Storage};
use std::path::Path;
use tracing::debug;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();
    debug!(db_path = %db_path.display(), command = ?cli.command, "executing command");

    match &cli.command {
        Commands::Init => cmd_init(&db_path, format),
        Commands::Summary => cmd_summary(&db_path, format),
        Commands::Add(fields) => cmd_add(&db_path, fields, format),
        Commands::Update { id, fields } => cmd_update(&db_path, *id, fields, format),
        Commands::Delete { id, yes } => cmd_delete(&db_path, *id, *yes, format),
        Commands::Genre { action } => match action {
            GenreCommands::Add {
                name,
                description,
                examples,
            } => cmd_genre_add(&db_path, &genre_fields(name, description, examples), format),
            GenreCommands::Update {
                id,
                name,
                description,
                examples,
            } => cmd_genre_update(
                &db_path,
                *id,
                &genre_fields(name, description, examples),
                format,
            ),
            GenreCommands::Delete { id, name, yes } => cmd_classification_delete(
                &db_path,
                Classification::Genre,
                *id,
                name,
                *yes,
                format,
            ),
            GenreCommands::List { page_size } => {
                cmd_list_table(&db_path, Table::Genres, *page_size, format)
            }
        },
        Commands::MediaType { action } => match action {
            TypeCommands::Add { name } => cmd_type_add(&db_path, name, format),
            TypeCommands::Update { id, name } => cmd_type_update(&db_path, *id, name, format),
            TypeCommands::Delete { id, name, yes } => cmd_classification_delete(
                &db_path,
                Classification::MediaType,
                *id,
                name,
                *yes,
                format,
            ),
            TypeCommands::List { page_size } => {
                cmd_list_table(&db_path, Table::MediaTypes, *page_size, format)
            }
        },
        Commands::List {
            table,
            column,
            distinct,
            page_size,
        } => cmd_list(&db_path, *table, *column, *distinct, *page_size, format),
        Commands::Filter {
            table,
            column,
            value,
            page_size,
        } => cmd_filter(&db_path, *table, *column, value, *page_size, format),
        Commands::Search {
            query,
            column,
            page_size,
        } => cmd_search(&db_path, query, *column, *page_size, format),
        Commands::Show { title } => cmd_show(&db_path, title, format),
        Commands::Convert {
            kind,
            from,
            to,
            yes,
        } => cmd_convert(&db_path, *kind, from, to, *yes, format),
    }
}

/// Opens storage and ensures it's initialized.
fn open_storage(db_path: &Path) -> Result<SqliteStorage> {
    let storage = SqliteStorage::open(db_path)?;

    if !storage.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(storage)
}

fn require_confirmation(yes: bool, what: &str) -> Result<()> {
    if yes {
        Ok(())
    } else {
        Err(CommandError::ExecutionFailed(format!("Use --yes to confirm {what}.")).into())
    }
}

/// Validates entry fields before they reach the store.
fn validated_entry(fields: &EntryArgs) -> Result<NewMediaEntry> {
    let entry = fields.to_entry();
    if entry.title.trim().is_empty() {
        return Err(CommandError::InvalidArgument("title must not be empty".to_string()).into());
    }
    Ok(entry)
}

fn genre_fields(name: &str, description: &str, examples: &str) -> NewGenre {
    NewGenre::named(name)
        .with_description(description)
        .with_examples(examples)
}

fn require_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArgument(format!("{what} name must not be empty")).into());
    }
    Ok(())
}

/// Drains a stream, stopping at the first error.
fn collect_rows<T>(rows: impl Iterator<Item = Result<T>>) -> Result<Vec<T>> {
    rows.collect()
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, format: OutputFormat) -> Result<String> {
    let mut storage = SqliteStorage::open(db_path)?;
    storage.init()?;

    let output = match format {
        OutputFormat::Text => format!("Initialized media catalog at: {}\n", db_path.display()),
        OutputFormat::Json => summarize(&storage, db_path, format)?,
    };
    storage.close()?;
    Ok(output)
}

fn cmd_summary(db_path: &Path, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let output = summarize(&storage, db_path, format)?;
    storage.close()?;
    Ok(output)
}

fn summarize(storage: &SqliteStorage, db_path: &Path, format: OutputFormat) -> Result<String> {
    let description = storage.describe()?;
    let summary = storage.count_by_type()?;
    Ok(format_summary(
        &description,
        &db_path.display().to_string(),
        &summary,
        format,
    ))
}

fn cmd_add(db_path: &Path, fields: &EntryArgs, format: OutputFormat) -> Result<String> {
    let entry = validated_entry(fields)?;
    let mut storage = open_storage(db_path)?;

    if storage.exists(Table::Media, Column::Title, &entry.title)? {
        return Err(CommandError::Duplicate(format!("title '{}'", entry.title)).into());
    }

    let id = storage.add_entry(&entry)?;
    storage.close()?;
    Ok(format_added("entry", &entry.title, id, format))
}

fn cmd_update(db_path: &Path, id: i64, fields: &EntryArgs, format: OutputFormat) -> Result<String> {
    let entry = validated_entry(fields)?;
    let mut storage = open_storage(db_path)?;
    let outcome = storage.update_entry(id, &entry)?;
    storage.close()?;
    Ok(format_outcome("Updated", "entry", id, outcome, format))
}

fn cmd_delete(db_path: &Path, id: i64, yes: bool, format: OutputFormat) -> Result<String> {
    require_confirmation(yes, "deletion")?;

    let mut storage = open_storage(db_path)?;
    let outcome = storage.delete_entry(id)?;
    storage.close()?;
    Ok(format_outcome("Deleted", "entry", id, outcome, format))
}

fn cmd_genre_add(db_path: &Path, genre: &NewGenre, format: OutputFormat) -> Result<String> {
    require_name(&genre.name, "genre")?;
    let mut storage = open_storage(db_path)?;

    if storage.exists(Table::Genres, Column::Name, &genre.name)? {
        return Err(CommandError::Duplicate(format!("genre '{}'", genre.name)).into());
    }

    let id = storage.add_genre(genre)?;
    storage.close()?;
    Ok(format_added("genre", &genre.name, id, format))
}

fn cmd_genre_update(
    db_path: &Path,
    id: i64,
    genre: &NewGenre,
    format: OutputFormat,
) -> Result<String> {
    require_name(&genre.name, "genre")?;
    let mut storage = open_storage(db_path)?;
    let outcome = storage.update_genre(id, genre)?;
    storage.close()?;
    Ok(format_outcome("Updated", "genre", id, outcome, format))
}

fn cmd_type_add(db_path: &Path, name: &str, format: OutputFormat) -> Result<String> {
    require_name(name, "media type")?;
    let mut storage = open_storage(db_path)?;

    if storage.exists(Table::MediaTypes, Column::Name, name)? {
        return Err(CommandError::Duplicate(format!("media type '{name}'")).into());
    }

    let id = storage.add_media_type(&NewMediaType::named(name))?;
    storage.close()?;
    Ok(format_added("media type", name, id, format))
}

fn cmd_type_update(db_path: &Path, id: i64, name: &str, format: OutputFormat) -> Result<String> {
    require_name(name, "media type")?;
    let mut storage = open_storage(db_path)?;
    let outcome = storage.update_media_type(id, &NewMediaType::named(name))?;
    storage.close()?;
    Ok(format_outcome("Updated", "media type", id, outcome, format))
}

fn cmd_classification_delete(
    db_path: &Path,
    kind: Classification,
    id: i64,
    name: &str,
    yes: bool,
    format: OutputFormat,
) -> Result<String> {
    require_confirmation(yes, "deletion")?;

    let mut storage = open_storage(db_path)?;
    let removal = storage.delete_classification(kind, id, name)?;
    storage.close()?;
    Ok(format_removal(kind.label(), name, removal, format))
}

fn cmd_list_table(
    db_path: &Path,
    table: Table,
    page_size: usize,
    format: OutputFormat,
) -> Result<String> {
    let storage = open_storage(db_path)?;
    let records = collect_rows(storage.list_records(table, page_size)?)?;
    storage.close()?;
    Ok(format_records(table, &records, format))
}

fn cmd_list(
    db_path: &Path,
    table: Table,
    column: Option<Selection>,
    distinct: bool,
    page_size: usize,
    format: OutputFormat,
) -> Result<String> {
    let storage = open_storage(db_path)?;
    let selection = column.unwrap_or(Selection::All);

    if distinct {
        let Selection::Column(column) = selection else {
            return Err(CommandError::InvalidArgument(
                "--distinct needs a single column".to_string(),
            )
            .into());
        };
        let values = collect_rows(storage.list_distinct(table, column, page_size)?)?;
        storage.close()?;
        return Ok(format_values(&values, format));
    }

    let items = collect_rows(storage.list_all(table, selection, page_size)?)?;
    storage.close()?;
    Ok(format_listing(table, items, format))
}

fn cmd_filter(
    db_path: &Path,
    table: Table,
    column: Column,
    value: &str,
    page_size: usize,
    format: OutputFormat,
) -> Result<String> {
    let storage = open_storage(db_path)?;
    let records = collect_rows(storage.filter(table, column, value, page_size)?)?;
    storage.close()?;
    Ok(format_records(table, &records, format))
}

fn cmd_search(
    db_path: &Path,
    query: &str,
    column: Option<Column>,
    page_size: usize,
    format: OutputFormat,
) -> Result<String> {
    let storage = open_storage(db_path)?;
    let entries = collect_rows(storage.search(query, column, page_size)?)?;
    storage.close()?;
    Ok(format_entries(&entries, format))
}

fn cmd_show(db_path: &Path, title: &str, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let entry = storage
        .entry_by_title(title)?
        .ok_or_else(|| CommandError::NotFound(format!("title '{title}'")))?;
    storage.close()?;
    Ok(format_entry(&entry, format))
}

fn cmd_convert(
    db_path: &Path,
    kind: Classification,
    from: &str,
    to: &str,
    yes: bool,
    format: OutputFormat,
) -> Result<String> {
    require_confirmation(yes, "conversion")?;
    if from == to {
        return Err(CommandError::InvalidArgument(format!(
            "nothing to convert: '{from}' is the same {kind}"
        ))
        .into());
    }

    let mut storage = open_storage(db_path)?;
    let count = storage.convert_entries(kind, from, to)?;
    storage.close()?;
    Ok(format_converted(kind.label(), from, to, count, format))
}
