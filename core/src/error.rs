use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not open database: {0}")]
    Connection(String),

    #[error("Store is not open")]
    NotOpen,

    #[error("Persist failed: {0}")]
    Persist(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Index {index} out of bounds for list of length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
