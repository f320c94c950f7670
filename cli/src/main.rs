use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use jotpad_core::storage::{NoteStore, SharedNoteStore};
use jotpad_tui::{config::load_config, App, Event, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config_dir = config_dir();
    init_logging(&config_dir)?;

    let config = load_config(&config_dir.join("config.toml"))?;

    // The store is opened exactly once here and shared by handle; its
    // lifecycle belongs to this entry point.
    let store = SharedNoteStore::new(
        NoteStore::open(&config.db_path)
            .with_context(|| format!("could not open note store at {}", config.db_path.display()))?,
    );

    let mut app = App::new(store, config);
    app.begin_load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::new(250); // 250ms tick rate

    // Main loop
    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("jotpad"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn init_logging(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let log_file = std::fs::File::create(dir.join("jotpad.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|f| jotpad_tui::ui::render(f, app))?;

        match event_handler.next()? {
            Event::Key(key) => {
                jotpad_tui::event::handle_key_event(key, app);
            }
            Event::Tick => {
                app.tick();
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
