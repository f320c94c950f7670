pub mod error;
pub mod loader;
pub mod models;
pub mod storage;
pub mod sync;

pub use error::{Error, Result};
