use super::database::{NoteRow, COLUMN_CREATED_AT, COLUMN_DESCRIPTION, COLUMN_ID, COLUMN_TITLE};
use crate::models::Note;
use crate::{Error, Result};
use rusqlite::types::Value;

/// Hydrate one [`Note`] from a raw row.
///
/// A missing or mistyped column is a schema/version mismatch, not a
/// recoverable condition; a half-populated note is never returned.
pub fn note_from_row(row: &NoteRow) -> Result<Note> {
    let id = integer_column(row, COLUMN_ID)?;
    let title = text_column(row, COLUMN_TITLE)?;
    let description = text_column(row, COLUMN_DESCRIPTION)?;
    let created_at = text_column(row, COLUMN_CREATED_AT)?;
    Ok(Note::persisted(id, title, description, created_at))
}

/// Hydrate a whole result set, preserving row order. An empty input maps
/// to an empty vec.
pub fn notes_from_rows(rows: &[NoteRow]) -> Result<Vec<Note>> {
    rows.iter().map(note_from_row).collect()
}

fn integer_column(row: &NoteRow, column: &str) -> Result<i64> {
    match row.get(column) {
        Some(Value::Integer(value)) => Ok(*value),
        Some(other) => Err(Error::SchemaMismatch(format!(
            "column `{column}` holds {other:?}, expected an integer"
        ))),
        None => Err(Error::SchemaMismatch(format!("column `{column}` is missing"))),
    }
}

fn text_column(row: &NoteRow, column: &str) -> Result<String> {
    match row.get(column) {
        Some(Value::Text(value)) => Ok(value.clone()),
        Some(other) => Err(Error::SchemaMismatch(format!(
            "column `{column}` holds {other:?}, expected text"
        ))),
        None => Err(Error::SchemaMismatch(format!("column `{column}` is missing"))),
    }
}
