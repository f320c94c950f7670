use crate::app::{App, EditField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the whole screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.size());

    render_note_list(f, app, chunks[0]);
    render_status_line(f, app, chunks[1]);

    if app.is_editing {
        render_editor(f, app);
    }
    if app.confirming_delete {
        render_confirm(f, "Delete this note? (y/n)");
    }
    if app.confirming_discard {
        render_confirm(f, "Discard changes to the form? (y/n)");
    }
}

fn render_note_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .list
        .notes()
        .iter()
        .map(|note| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    note.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    note.created_at.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(note.description.clone()),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Notes "))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.list.is_empty() {
        state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status_line(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(format!(
            " {}: new  {}: edit  {}: delete  {}: reload  {}: quit",
            app.config.keymap.create,
            app.config.keymap.edit,
            app.config.keymap.delete,
            app.config.keymap.reload,
            app.config.keymap.quit,
        )),
    };
    f.render_widget(Paragraph::new(text), area);
}

fn render_editor(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, f.size());
    f.render_widget(Clear, area);

    let title = if app.edit_target.is_some() {
        " Edit Note "
    } else {
        " New Note "
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let field_block = |label: &'static str, active: bool| {
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(label)
    };

    f.render_widget(
        Paragraph::new(app.title_buffer.clone())
            .block(field_block("Title", app.active_field == EditField::Title)),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(app.description_buffer.clone())
            .wrap(Wrap { trim: false })
            .block(field_block(
                "Description",
                app.active_field == EditField::Description,
            )),
        chunks[1],
    );

    let footer = match &app.title_error {
        Some(error) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "Enter: save  Tab: switch field  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(footer).alignment(Alignment::Center), chunks[2]);
}

fn render_confirm(f: &mut Frame, prompt: &str) {
    let area = centered_rect(50, 20, f.size());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(prompt)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Confirm ")),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
