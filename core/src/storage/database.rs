use crate::{Error, Result};
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

pub const TABLE_NOTE: &str = "note";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_TITLE: &str = "title";
pub const COLUMN_DESCRIPTION: &str = "description";
pub const COLUMN_CREATED_AT: &str = "createdAt";

const SCHEMA_VERSION: i64 = 1;

const SQL_CREATE_TABLE_NOTE: &str = "CREATE TABLE IF NOT EXISTS note (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    createdAt TEXT NOT NULL
)";

/// How to bring an out-of-date schema up to the current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpgradePolicy {
    /// Apply incremental migrations, preserving existing rows.
    #[default]
    Additive,
    /// Drop the note table and recreate it. DESTRUCTIVE: every existing
    /// note is discarded. Kept for compatibility with databases written
    /// before versioning; never the default.
    DropAndRecreate,
}

/// One raw result row: the column values exactly as the database returned
/// them, keyed by column name. A query produces a finite snapshot of these
/// rows, consumed once by the row mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRow {
    columns: Vec<(String, Value)>,
}

impl NoteRow {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Look a column up by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let stmt = row.as_ref();
        let mut columns = Vec::with_capacity(stmt.column_count());
        for index in 0..stmt.column_count() {
            let name = stmt.column_name(index)?.to_string();
            let value: Value = row.get(index)?;
            columns.push((name, value));
        }
        Ok(Self { columns })
    }
}

/// Owns the SQLite file backing the note table.
///
/// `open()` must be called before any query; after `close()` every
/// operation fails with [`Error::NotOpen`] until the database is reopened.
pub struct Database {
    db_path: PathBuf,
    upgrade_policy: UpgradePolicy,
    conn: Option<Connection>,
}

impl Database {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            upgrade_policy: UpgradePolicy::default(),
            conn: None,
        }
    }

    pub fn with_upgrade_policy(mut self, policy: UpgradePolicy) -> Self {
        self.upgrade_policy = policy;
        self
    }

    /// Open the connection, creating or upgrading the schema as needed.
    /// A no-op when already open.
    pub fn open(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.db_path)
            .map_err(|e| Error::Connection(format!("{}: {e}", self.db_path.display())))?;
        self.initialize_schema(&conn)?;
        self.conn = Some(conn);
        tracing::debug!(path = %self.db_path.display(), "database opened");
        Ok(())
    }

    /// Release the connection. Idempotent.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            tracing::debug!(path = %self.db_path.display(), "database closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    fn initialize_schema(&self, conn: &Connection) -> Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        if self.upgrade_policy == UpgradePolicy::DropAndRecreate && self.note_table_exists(conn)? {
            tracing::warn!(
                from = version,
                to = SCHEMA_VERSION,
                "destructive schema upgrade: dropping the note table"
            );
            conn.execute_batch("DROP TABLE IF EXISTS note")?;
        } else if version > 0 {
            self.migrate_additive(conn, version)?;
        }

        conn.execute_batch(SQL_CREATE_TABLE_NOTE)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tracing::debug!(version = SCHEMA_VERSION, "note schema ready");
        Ok(())
    }

    /// Incremental migration steps land here as the schema version grows.
    fn migrate_additive(&self, _conn: &Connection, from_version: i64) -> Result<()> {
        tracing::debug!(from = from_version, to = SCHEMA_VERSION, "additive migration");
        Ok(())
    }

    fn note_table_exists(&self, conn: &Connection) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![TABLE_NOTE],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All rows ordered by id ascending. Ids are assigned monotonically,
    /// so this is also insertion order.
    pub fn query_all(&self) -> Result<Vec<NoteRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT * FROM note ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], NoteRow::from_sql_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Zero or one raw row for the given id.
    pub fn query_by_id(&self, id: i64) -> Result<Option<NoteRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT * FROM note WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], NoteRow::from_sql_row)?;
        Ok(rows.next().transpose()?)
    }

    /// Insert a note and return its assigned id.
    pub fn insert(&self, title: &str, description: &str, created_at: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO note (title, description, createdAt) VALUES (?1, ?2, ?3)",
            params![title, description, created_at],
        )?;
        let id = conn.last_insert_rowid();
        if id <= 0 {
            return Err(Error::Persist("insert did not assign a row id".to_string()));
        }
        Ok(id)
    }

    /// Update title and description for the given id, returning the
    /// affected row count (1 or 0). `createdAt` is never touched.
    pub fn update(&self, id: i64, title: &str, description: &str) -> Result<usize> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE note SET title = ?1, description = ?2 WHERE id = ?3",
            params![title, description, id],
        )?;
        Ok(affected)
    }

    /// Delete the row with the given id, returning the affected row count
    /// (1 or 0).
    pub fn delete_by_id(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM note WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_test_db(path: &Path) -> Database {
        let mut db = Database::new(path);
        db.open().unwrap();
        db
    }

    #[test]
    fn test_open_creates_schema() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir.path().join("test.db"));
        assert!(db.is_open());
        assert!(db.query_all().unwrap().is_empty());
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut db = open_test_db(&dir.path().join("test.db"));
        db.open().unwrap();
        assert!(db.is_open());
    }

    #[test]
    fn test_reopen_preserves_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let mut db = open_test_db(&path);
        db.insert("Groceries", "Milk, eggs", "2024/01/01 10:00:00")
            .unwrap();
        db.close();

        db.open().unwrap();
        assert_eq!(db.query_all().unwrap().len(), 1);
    }

    #[test]
    fn test_closed_database_rejects_operations() {
        let dir = tempdir().unwrap();
        let mut db = open_test_db(&dir.path().join("test.db"));
        db.close();
        db.close(); // idempotent

        assert!(matches!(db.query_all(), Err(Error::NotOpen)));
        assert!(matches!(db.insert("a", "b", "c"), Err(Error::NotOpen)));
        assert!(matches!(db.update(1, "a", "b"), Err(Error::NotOpen)));
        assert!(matches!(db.delete_by_id(1), Err(Error::NotOpen)));
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir.path().join("test.db"));

        let first = db.insert("One", "", "2024/01/01 10:00:00").unwrap();
        let second = db.insert("Two", "", "2024/01/01 10:00:01").unwrap();
        assert!(second > first);

        // Deleting the newest row must not free its id for reuse.
        assert_eq!(db.delete_by_id(second).unwrap(), 1);
        let third = db.insert("Three", "", "2024/01/01 10:00:02").unwrap();
        assert!(third > second);
    }

    #[test]
    fn test_query_by_id() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir.path().join("test.db"));

        let id = db.insert("One", "first", "2024/01/01 10:00:00").unwrap();
        let row = db.query_by_id(id).unwrap().unwrap();
        assert_eq!(row.get(COLUMN_TITLE), Some(&Value::Text("One".to_string())));
        assert!(db.query_by_id(id + 1).unwrap().is_none());
    }

    #[test]
    fn test_update_counts_affected_rows() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir.path().join("test.db"));

        let id = db.insert("One", "first", "2024/01/01 10:00:00").unwrap();
        assert_eq!(db.update(id, "One", "revised").unwrap(), 1);
        assert_eq!(db.update(id + 1, "ghost", "row").unwrap(), 0);

        // createdAt survives the update untouched.
        let row = db.query_by_id(id).unwrap().unwrap();
        assert_eq!(
            row.get(COLUMN_CREATED_AT),
            Some(&Value::Text("2024/01/01 10:00:00".to_string()))
        );
    }

    #[test]
    fn test_delete_counts_affected_rows() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir.path().join("test.db"));

        let id = db.insert("One", "", "2024/01/01 10:00:00").unwrap();
        assert_eq!(db.delete_by_id(id).unwrap(), 1);
        assert_eq!(db.delete_by_id(id).unwrap(), 0);
    }

    fn seed_unversioned_db(path: &Path) {
        // A database written before schema versioning: table present,
        // user_version still 0.
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(SQL_CREATE_TABLE_NOTE).unwrap();
        conn.execute(
            "INSERT INTO note (title, description, createdAt) VALUES ('Old', '', '2023/12/31 23:59:59')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_additive_upgrade_preserves_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        seed_unversioned_db(&path);

        let mut db = Database::new(&path).with_upgrade_policy(UpgradePolicy::Additive);
        db.open().unwrap();
        assert_eq!(db.query_all().unwrap().len(), 1);
    }

    #[test]
    fn test_destructive_upgrade_discards_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        seed_unversioned_db(&path);

        let mut db = Database::new(&path).with_upgrade_policy(UpgradePolicy::DropAndRecreate);
        db.open().unwrap();
        assert!(db.query_all().unwrap().is_empty());
    }
}
