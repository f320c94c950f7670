mod database;
mod mapper;
mod note_store;

pub use database::{
    Database, NoteRow, UpgradePolicy, COLUMN_CREATED_AT, COLUMN_DESCRIPTION, COLUMN_ID,
    COLUMN_TITLE, TABLE_NOTE,
};
pub use mapper::{note_from_row, notes_from_rows};
pub use note_store::{NoteStore, SharedNoteStore};
