use super::database::{Database, UpgradePolicy};
use super::mapper;
use crate::models::{format_timestamp, Note};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Source of "now" for creation timestamps. A plain function pointer so
/// tests can pin the clock.
pub type Clock = fn() -> DateTime<Local>;

/// CRUD façade over the persistence layer and the row mapper.
///
/// Constructed explicitly at process startup and shared via
/// [`SharedNoteStore`]; lifecycle (open/close) belongs to the caller, not
/// to lazy global state.
pub struct NoteStore {
    db: Database,
    clock: Clock,
}

impl NoteStore {
    /// Open the store at the given path with the default (additive)
    /// upgrade policy.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::open_with(db_path, UpgradePolicy::Additive)
    }

    pub fn open_with<P: AsRef<Path>>(db_path: P, policy: UpgradePolicy) -> Result<Self> {
        let mut db = Database::new(db_path).with_upgrade_policy(policy);
        db.open()?;
        Ok(Self {
            db,
            clock: Local::now,
        })
    }

    /// Replace the clock used for `created_at` stamps.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Release the underlying connection. Operations after close fail
    /// with [`Error::NotOpen`]; the store never reconnects on its own.
    pub fn close(&mut self) {
        self.db.close();
    }

    pub fn is_open(&self) -> bool {
        self.db.is_open()
    }

    /// All notes, ordered by id ascending.
    pub fn list_all(&self) -> Result<Vec<Note>> {
        let rows = self.db.query_all()?;
        mapper::notes_from_rows(&rows)
    }

    pub fn get(&self, id: i64) -> Result<Option<Note>> {
        match self.db.query_by_id(id)? {
            Some(row) => Ok(Some(mapper::note_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Persist a new note. The store assigns the id and stamps
    /// `created_at` from its clock; the caller supplies neither.
    pub fn create(&self, title: &str, description: &str) -> Result<Note> {
        validate_title(title)?;
        let created_at = format_timestamp(&(self.clock)());
        let id = self.db.insert(title, description, &created_at)?;
        tracing::debug!(id, "note created");
        Ok(Note::persisted(
            id,
            title.to_string(),
            description.to_string(),
            created_at,
        ))
    }

    /// Change title and description of an existing note. Returns true iff
    /// exactly one row changed; `created_at` stays untouched either way.
    pub fn update(&self, id: i64, title: &str, description: &str) -> Result<bool> {
        validate_title(title)?;
        let affected = self.db.update(id, title, description)?;
        tracing::debug!(id, affected, "note updated");
        Ok(affected == 1)
    }

    /// Remove a note. Returns true iff exactly one row was removed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.db.delete_by_id(id)?;
        tracing::debug!(id, affected, "note deleted");
        Ok(affected == 1)
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::InvalidInput("title can not be blank".to_string()));
    }
    Ok(())
}

/// Cloneable handle to the one store instance of the process.
///
/// Replaces the global double-checked singleton of older designs: the
/// entry point opens the store once, wraps it, and hands clones to every
/// consumer. All clones serialize on the same underlying connection.
#[derive(Clone)]
pub struct SharedNoteStore {
    inner: Arc<Mutex<NoteStore>>,
}

impl SharedNoteStore {
    pub fn new(store: NoteStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NoteStore> {
        // A poisoned lock only means another thread panicked mid-call;
        // the store itself holds no partial state worth rejecting.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn list_all(&self) -> Result<Vec<Note>> {
        self.lock().list_all()
    }

    pub fn get(&self, id: i64) -> Result<Option<Note>> {
        self.lock().get(id)
    }

    pub fn create(&self, title: &str, description: &str) -> Result<Note> {
        self.lock().create(title, description)
    }

    pub fn update(&self, id: i64, title: &str, description: &str) -> Result<bool> {
        self.lock().update(id, title, description)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        self.lock().delete(id)
    }

    pub fn close(&self) {
        self.lock().close();
    }
}
