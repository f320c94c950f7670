use crate::models::Note;
use crate::{Error, Result};

/// What a single mutation did to the displayed collection, so a rendering
/// layer can apply a minimal update instead of a full redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// The whole collection was replaced.
    FullReset,
    /// One element was inserted at this index.
    Inserted(usize),
    /// The element at this index was replaced.
    Changed(usize),
    /// The element at this index was removed.
    Removed(usize),
    /// Positions in `from..to` shifted; cached positions for them are
    /// stale.
    RangeInvalidated { from: usize, to: usize },
}

/// Ordered, displayable copy of the notes currently shown.
///
/// Never the source of truth: the store leads, this trails it by exactly
/// one synchronized step. Every mutation returns the change it made;
/// bounds failures leave the collection untouched. Primary-thread only.
#[derive(Debug, Default)]
pub struct ListSynchronizer {
    notes: Vec<Note>,
}

impl ListSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Clear and repopulate the whole collection.
    pub fn replace_all(&mut self, notes: Vec<Note>) -> ListChange {
        self.notes = notes;
        ListChange::FullReset
    }

    /// Append one note.
    pub fn insert_at_end(&mut self, note: Note) -> ListChange {
        self.notes.push(note);
        ListChange::Inserted(self.notes.len() - 1)
    }

    /// Replace the note at `index`.
    pub fn update_at(&mut self, index: usize, note: Note) -> Result<ListChange> {
        let len = self.notes.len();
        let slot = self.notes.get_mut(index).ok_or(Error::OutOfBounds { index, len })?;
        *slot = note;
        Ok(ListChange::Changed(index))
    }

    /// Remove the note at `index`. The second change signals that every
    /// trailing element shifted down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<(ListChange, ListChange)> {
        if index >= self.notes.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.notes.len(),
            });
        }
        self.notes.remove(index);
        Ok((
            ListChange::Removed(index),
            ListChange::RangeInvalidated {
                from: index,
                to: self.notes.len(),
            },
        ))
    }

    /// Copy of the collection, for handing across a display-surface
    /// restart.
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.clone()
    }

    /// Reinstate a snapshot verbatim, without going back to the store.
    pub fn restore(&mut self, snapshot: Vec<Note>) -> ListChange {
        self.replace_all(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, title: &str) -> Note {
        Note::persisted(
            id,
            title.to_string(),
            String::new(),
            "2024/01/01 10:00:00".to_string(),
        )
    }

    fn synced(titles: &[&str]) -> ListSynchronizer {
        let mut sync = ListSynchronizer::new();
        sync.replace_all(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| note(i as i64 + 1, t))
                .collect(),
        );
        sync
    }

    #[test]
    fn test_replace_all_signals_full_reset() {
        let mut sync = ListSynchronizer::new();
        let change = sync.replace_all(vec![note(1, "a"), note(2, "b")]);
        assert_eq!(change, ListChange::FullReset);
        assert_eq!(sync.len(), 2);
    }

    #[test]
    fn test_insert_at_end_signals_new_index() {
        let mut sync = synced(&["a", "b"]);
        let change = sync.insert_at_end(note(3, "c"));
        assert_eq!(change, ListChange::Inserted(2));
        assert_eq!(sync.get(2).unwrap().title, "c");
    }

    #[test]
    fn test_update_at_signals_changed_index() {
        let mut sync = synced(&["a", "b"]);
        let change = sync.update_at(1, note(2, "b2")).unwrap();
        assert_eq!(change, ListChange::Changed(1));
        assert_eq!(sync.get(1).unwrap().title, "b2");
    }

    #[test]
    fn test_remove_at_signals_removal_and_shifted_range() {
        let mut sync = synced(&["a", "b", "c"]);
        let (removed, invalidated) = sync.remove_at(0).unwrap();
        assert_eq!(removed, ListChange::Removed(0));
        assert_eq!(invalidated, ListChange::RangeInvalidated { from: 0, to: 2 });

        let titles: Vec<_> = sync.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn test_out_of_bounds_leaves_collection_unmodified() {
        let mut sync = synced(&["a", "b"]);

        assert!(matches!(
            sync.update_at(2, note(9, "x")),
            Err(Error::OutOfBounds { index: 2, len: 2 })
        ));
        assert!(matches!(
            sync.remove_at(5),
            Err(Error::OutOfBounds { index: 5, len: 2 })
        ));

        let titles: Vec<_> = sync.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut sync = synced(&["a", "b", "c"]);
        let snapshot = sync.snapshot();

        let mut restored = ListSynchronizer::new();
        assert_eq!(restored.restore(snapshot), ListChange::FullReset);
        assert_eq!(restored.notes(), sync.notes());
    }
}
