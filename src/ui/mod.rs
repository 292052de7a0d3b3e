//! Rendering: the static shell (navbar + footer) around the users screen.
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub const BRAND: &str = "Crude Web App";
pub const FOOTER: &str = "\u{a9} 2024 - CRUDE WEBAPP";

pub fn render(f: &mut Frame, app: &AppState) {
    let creating = app.controller.create_draft().is_some();
    let error_height = if app.controller.last_error().is_some() { 3 } else { 0 };
    let form_height = if creating { 7 } else { 0 };

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(form_height),
            Constraint::Length(error_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_navbar(f, root[0], app);
    users::render_search_bar(f, root[1], app);
    if app.controller.is_busy() {
        components::render_loading(f, root[2], app);
    } else {
        users::render_users_table(f, root[2], app);
    }
    if creating {
        users::render_create_form(f, root[3], app);
    }
    if let Some(message) = app.controller.last_error() {
        components::render_error(f, root[4], app, message);
    }
    render_footer(f, root[5], app);
    components::render_status_bar(f, root[6], app);

    if app.input_mode == InputMode::Help {
        components::render_help_modal(f, f.area(), app);
    }
}

fn render_navbar(f: &mut Frame, area: Rect, app: &AppState) {
    let line = Line::from(vec![
        Span::styled(BRAND, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("[Crude]", Style::default().fg(app.theme.header_fg)),
    ]);
    let p = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new(FOOTER)
        .alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(app.theme.muted));
    f.render_widget(p, area);
}
