use crate::config::Config;
use jotpad_core::loader::{load_notes_async, LoadHandle};
use jotpad_core::models::Note;
use jotpad_core::storage::SharedNoteStore;
use jotpad_core::sync::{ListChange, ListSynchronizer};
use jotpad_core::Error;
use std::time::{Duration, Instant};

const STATUS_TTL: Duration = Duration::from_secs(4);

/// Which editor field currently receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
}

/// Application state for the single note-list screen.
///
/// Owns the displayed collection and drives every store command. A write
/// is always committed to the store before the displayed list is touched
/// and before any status message appears.
pub struct App {
    pub should_quit: bool,
    pub config: Config,
    store: SharedNoteStore,
    pub list: ListSynchronizer,
    pub selected_index: usize,
    pending_load: Option<LoadHandle>,
    pub status_message: Option<String>,
    status_set_at: Option<Instant>,
    pub is_editing: bool,
    /// List position of the note being edited; `None` while drafting a
    /// new note.
    pub edit_target: Option<usize>,
    pub title_buffer: String,
    pub description_buffer: String,
    pub active_field: EditField,
    pub title_error: Option<String>,
    pub confirming_discard: bool,
    pub confirming_delete: bool,
}

impl App {
    pub fn new(store: SharedNoteStore, config: Config) -> Self {
        Self {
            should_quit: false,
            config,
            store,
            list: ListSynchronizer::new(),
            selected_index: 0,
            pending_load: None,
            status_message: None,
            status_set_at: None,
            is_editing: false,
            edit_target: None,
            title_buffer: String::new(),
            description_buffer: String::new(),
            active_field: EditField::Title,
            title_error: None,
            confirming_discard: false,
            confirming_delete: false,
        }
    }

    /// Rebuild the screen from a snapshot taken before a surface restart,
    /// handing the collection back verbatim instead of re-querying.
    pub fn restore_from(store: SharedNoteStore, config: Config, snapshot: Vec<Note>) -> Self {
        let mut app = Self::new(store, config);
        app.list.restore(snapshot);
        app
    }

    /// Copy of the displayed collection, for `restore_from`.
    pub fn snapshot(&self) -> Vec<Note> {
        self.list.snapshot()
    }

    /// Kick off a background list load, superseding any pending one.
    pub fn begin_load(&mut self) {
        if let Some(handle) = self.pending_load.take() {
            handle.cancel();
        }
        self.pending_load = Some(load_notes_async(self.store.clone()));
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Periodic housekeeping: pick up a finished background load and
    /// expire stale status messages.
    pub fn tick(&mut self) {
        if let Some(result) = self.pending_load.as_ref().and_then(|handle| handle.poll()) {
            self.pending_load = None;
            match result {
                Ok(notes) => {
                    let empty = notes.is_empty();
                    self.list.replace_all(notes);
                    self.clamp_selection();
                    if empty {
                        self.set_status("no notes yet");
                    }
                }
                Err(err) => {
                    tracing::error!(%err, "background load failed");
                    self.set_status("could not load notes");
                }
            }
        }

        if let Some(set_at) = self.status_set_at {
            if set_at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                self.status_set_at = None;
            }
        }
    }

    fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_set_at = Some(Instant::now());
    }

    fn clamp_selection(&mut self) {
        if self.selected_index >= self.list.len() {
            self.selected_index = self.list.len().saturating_sub(1);
        }
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.list.get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.list.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Open the editor with an empty draft.
    pub fn open_editor_for_new(&mut self) {
        self.is_editing = true;
        self.edit_target = None;
        self.title_buffer.clear();
        self.description_buffer.clear();
        self.active_field = EditField::Title;
        self.title_error = None;
    }

    /// Open the editor pre-filled with the selected note.
    pub fn open_editor_for_selected(&mut self) {
        let Some(note) = self.selected_note() else {
            return;
        };
        let title = note.title.clone();
        let description = note.description.clone();
        self.title_buffer = title;
        self.description_buffer = description;
        self.is_editing = true;
        self.edit_target = Some(self.selected_index);
        self.active_field = EditField::Title;
        self.title_error = None;
    }

    pub fn toggle_field(&mut self) {
        self.active_field = match self.active_field {
            EditField::Title => EditField::Description,
            EditField::Description => EditField::Title,
        };
    }

    pub fn push_input_char(&mut self, c: char) {
        match self.active_field {
            EditField::Title => self.title_buffer.push(c),
            EditField::Description => self.description_buffer.push(c),
        }
        self.title_error = None;
    }

    pub fn backspace_input(&mut self) {
        match self.active_field {
            EditField::Title => self.title_buffer.pop(),
            EditField::Description => self.description_buffer.pop(),
        };
    }

    /// Commit the editor contents: create a new note or update the
    /// targeted one.
    pub fn save_editor(&mut self) {
        match self.edit_target {
            None => self.create_from_editor(),
            Some(position) => self.update_from_editor(position),
        }
    }

    fn create_from_editor(&mut self) {
        let title = self.title_buffer.clone();
        let description = self.description_buffer.clone();
        match self.store.create(&title, &description) {
            Ok(note) => {
                if let ListChange::Inserted(index) = self.list.insert_at_end(note) {
                    self.selected_index = index;
                }
                self.close_editor();
                self.set_status("note added");
            }
            Err(Error::InvalidInput(message)) => {
                self.title_error = Some(message);
            }
            Err(err) => {
                tracing::error!(%err, "create failed");
                self.close_editor();
                self.set_status("could not add note");
            }
        }
    }

    fn update_from_editor(&mut self, position: usize) {
        let Some((id, created_at)) = self
            .list
            .get(position)
            .and_then(|note| note.id.map(|id| (id, note.created_at.clone())))
        else {
            self.report_index_error(position);
            self.close_editor();
            return;
        };

        let title = self.title_buffer.clone();
        let description = self.description_buffer.clone();
        match self.store.update(id, &title, &description) {
            Ok(true) => {
                let note = Note::persisted(id, title, description, created_at);
                if let Err(err) = self.list.update_at(position, note) {
                    debug_assert!(false, "stale list position: {err}");
                    tracing::error!(%err, position, "list update skipped");
                }
                self.close_editor();
                self.set_status("note updated");
            }
            Ok(false) => {
                self.close_editor();
                self.set_status("could not update note");
            }
            Err(Error::InvalidInput(message)) => {
                self.title_error = Some(message);
            }
            Err(err) => {
                tracing::error!(%err, "update failed");
                self.close_editor();
                self.set_status("could not update note");
            }
        }
    }

    /// Ask for confirmation before deleting the selected note.
    pub fn request_delete_selected(&mut self) {
        if self.selected_note().is_some() {
            self.confirming_delete = true;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.confirming_delete = false;
        let position = self.selected_index;
        let Some(id) = self.list.get(position).and_then(|note| note.id) else {
            return;
        };

        match self.store.delete(id) {
            Ok(true) => {
                if let Err(err) = self.list.remove_at(position) {
                    debug_assert!(false, "stale list position: {err}");
                    tracing::error!(%err, position, "list removal skipped");
                }
                self.clamp_selection();
                self.set_status("note deleted");
            }
            Ok(false) => self.set_status("could not delete note"),
            Err(err) => {
                tracing::error!(%err, "delete failed");
                self.set_status("could not delete note");
            }
        }
    }

    pub fn abort_delete(&mut self) {
        self.confirming_delete = false;
    }

    /// Leaving the editor always asks before discarding the form.
    pub fn request_discard_editor(&mut self) {
        self.confirming_discard = true;
    }

    pub fn confirm_discard(&mut self) {
        self.confirming_discard = false;
        self.close_editor();
    }

    pub fn abort_discard(&mut self) {
        self.confirming_discard = false;
    }

    fn close_editor(&mut self) {
        self.is_editing = false;
        self.edit_target = None;
        self.title_buffer.clear();
        self.description_buffer.clear();
        self.title_error = None;
    }

    fn report_index_error(&self, position: usize) {
        debug_assert!(false, "edit target {position} is out of bounds");
        tracing::error!(position, len = self.list.len(), "edit target out of bounds");
    }

    /// Tear the screen down: cancel any in-flight load and release the
    /// store connection.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.pending_load.take() {
            handle.cancel();
        }
        self.store.close();
    }
}
