use serde::{Deserialize, Serialize};

/// One user note.
///
/// A note starts life as a draft with no id; the store assigns the id and
/// the creation timestamp at insertion. `created_at` is never changed by
/// an update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub created_at: String,
}

impl Note {
    /// Create an in-memory draft that has not been persisted yet.
    pub fn draft(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            created_at: String::new(),
        }
    }

    /// Build a fully persisted note (for hydration from the store).
    pub fn persisted(id: i64, title: String, description: String, created_at: String) -> Self {
        Self {
            id: Some(id),
            title,
            description,
            created_at,
        }
    }

    /// Whether this note has been assigned an id by the store.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
