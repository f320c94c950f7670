use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick event
    Tick,
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                return Ok(Event::Key(key));
            }
        }
        Ok(Event::Tick)
    }
}

/// Handle key events for the application
pub fn handle_key_event(key: KeyEvent, app: &mut crate::app::App) {
    // On Windows, crossterm reports both key press and release events.
    // We only want to handle press events to avoid duplicates.
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Confirmation prompts take precedence
    if app.confirming_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => app.abort_delete(),
            _ => {}
        }
        return;
    }

    if app.confirming_discard {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_discard(),
            KeyCode::Char('n') | KeyCode::Esc => app.abort_discard(),
            _ => {}
        }
        return;
    }

    if app.is_editing {
        match key.code {
            KeyCode::Esc => app.request_discard_editor(),
            KeyCode::Enter => app.save_editor(),
            KeyCode::Tab => app.toggle_field(),
            KeyCode::Backspace => app.backspace_input(),
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.push_input_char(c);
                }
            }
            _ => {}
        }
        return;
    }

    // Browsing
    let keymap = app.config.keymap.clone();
    match key.code {
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::Enter => app.open_editor_for_selected(),
        KeyCode::Char(c) => {
            let pressed = c.to_string();
            if pressed == keymap.quit {
                app.should_quit = true;
            } else if pressed == keymap.create {
                app.open_editor_for_new();
            } else if pressed == keymap.edit {
                app.open_editor_for_selected();
            } else if pressed == keymap.delete {
                app.request_delete_selected();
            } else if pressed == keymap.reload {
                app.begin_load();
            } else if pressed == keymap.move_up {
                app.select_previous();
            } else if pressed == keymap.move_down {
                app.select_next();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::config::Config;
    use jotpad_core::storage::{NoteStore, SharedNoteStore};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(dir.path().join("test.db")).unwrap();
        let app = App::new(SharedNoteStore::new(store), Config::default());
        (dir, app)
    }

    #[test]
    fn test_quit_key() {
        let (_dir, mut app) = test_app();
        handle_key_event(press(KeyCode::Char('q')), &mut app);
        assert!(app.should_quit);
    }

    #[test]
    fn test_create_key_opens_editor() {
        let (_dir, mut app) = test_app();
        handle_key_event(press(KeyCode::Char('n')), &mut app);
        assert!(app.is_editing);
        assert!(app.edit_target.is_none());
    }

    #[test]
    fn test_typed_text_lands_in_active_field() {
        let (_dir, mut app) = test_app();
        handle_key_event(press(KeyCode::Char('n')), &mut app);
        handle_key_event(press(KeyCode::Char('h')), &mut app);
        handle_key_event(press(KeyCode::Char('i')), &mut app);
        assert_eq!(app.title_buffer, "hi");

        handle_key_event(press(KeyCode::Tab), &mut app);
        handle_key_event(press(KeyCode::Char('x')), &mut app);
        assert_eq!(app.description_buffer, "x");
    }

    #[test]
    fn test_escape_in_editor_asks_before_discarding() {
        let (_dir, mut app) = test_app();
        handle_key_event(press(KeyCode::Char('n')), &mut app);
        handle_key_event(press(KeyCode::Esc), &mut app);
        assert!(app.confirming_discard);

        handle_key_event(press(KeyCode::Char('n')), &mut app);
        assert!(!app.confirming_discard);
        assert!(app.is_editing);
    }

    #[test]
    fn test_enter_in_editor_saves() {
        let (_dir, mut app) = test_app();
        handle_key_event(press(KeyCode::Char('n')), &mut app);
        for c in "Groceries".chars() {
            handle_key_event(press(KeyCode::Char(c)), &mut app);
        }
        handle_key_event(press(KeyCode::Enter), &mut app);
        assert!(!app.is_editing);
        assert_eq!(app.list.len(), 1);
    }
}
