//! Shared UI components (status bar, loading/error panels, help dialog).
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::EditRow => "EDIT",
        InputMode::CreateForm => "CREATE",
        InputMode::Help => "HELP",
    };
    let query = match app.controller.search_query() {
        "" => String::new(),
        q => format!("  query:\"{q}\""),
    };
    let msg = format!(
        "mode: {mode}  users:{}  shown:{}{}  ?: help  q: quit",
        app.controller.users().len(),
        app.controller.visible().len(),
        query
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Spinner shown in place of the table while a request is in flight.
pub fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    let tick = (app.started_at.elapsed().as_millis() / 100) as usize % SPINNER.len();
    let p = Paragraph::new(format!("{} Loading...", SPINNER[tick]))
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

/// Alert box holding the last remote failure.
pub fn render_error(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let p = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(app.theme.error_fg))
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error_fg)),
        );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Help dialog listing the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Table", bold))];
    for (label, action) in [
        ("Move", KeyAction::MoveDown),
        ("Search", KeyAction::StartSearch),
        ("Edit row", KeyAction::EditSelection),
        ("Delete row", KeyAction::DeleteSelection),
        ("Create user", KeyAction::NewUser),
        ("Reload", KeyAction::Reload),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ] {
        let mut keys = app.keymap.keys_for(action);
        if action == KeyAction::MoveDown {
            keys.extend(app.keymap.keys_for(KeyAction::MoveUp));
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<12} ")),
            Span::styled(keys.join(", "), italic),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Forms", bold)));
    for (label, keys) in [
        ("Next field", "Tab, Down"),
        ("Prev field", "Shift+Tab, Up"),
        ("Submit", "Enter"),
        ("Cancel", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<12} ")),
            Span::styled(keys, italic),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Actions are disabled while a request is in flight.",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
