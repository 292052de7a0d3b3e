use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, InputMode};
use crate::remote::UserField;

pub fn render_search_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.input_mode == InputMode::Search;
    let text = if app.search_input.is_empty() && !active {
        Span::styled("Search by name or email", Style::default().fg(app.theme.muted))
    } else if active {
        Span::raw(format!("{}_", app.search_input))
    } else {
        Span::raw(app.search_input.clone())
    };
    let border = if active { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(Line::from(text)).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title("Search (/)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

/// Users table over the visible slice; the row being edited shows the draft.
pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.controller.edit_draft();

    let rows = app.controller.visible().iter().enumerate().map(|(i, u)| {
        let draft = editing.filter(|d| d.id == u.id);
        let cells = UserField::ALL.into_iter().map(|field| match draft {
            Some(d) => {
                let value = d.field(field);
                if app.input_mode == InputMode::EditRow && field == app.focused_field {
                    Cell::from(format!("[{value}_]"))
                        .style(Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD))
                } else {
                    Cell::from(format!("[{value}]"))
                }
            }
            None => Cell::from(u.field(field).to_string()),
        });
        let actions = match draft {
            Some(_) if app.controller.is_busy() => "Saving...",
            Some(_) => "Enter: update  Esc: cancel",
            None => "e: edit  d: delete",
        };
        let style = if i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(cells.chain(std::iter::once(Cell::from(actions)))).style(style)
    });

    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
    ];
    let header = Row::new(vec!["Name", "Email", "Phone", "Actions"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = format!(
        "Users List ({} of {})",
        app.controller.visible().len(),
        app.controller.users().len()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_bottom(Line::from(" n: create new user ").right_aligned())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_create_form(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(draft) = app.controller.create_draft() else {
        return;
    };
    let mut lines: Vec<Line> = UserField::ALL
        .into_iter()
        .map(|field| {
            let focused = field == app.focused_field;
            let marker = if focused { "\u{25b6} " } else { "  " };
            let value = if focused {
                format!("{}_", draft.field(field))
            } else {
                draft.field(field).to_string()
            };
            let style = if focused {
                Style::default().fg(app.theme.highlight_fg)
            } else {
                Style::default().fg(app.theme.text)
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<6} ", field.label()), Style::default().fg(app.theme.title)),
                Span::styled(value, style),
            ])
        })
        .collect();
    let hint = if app.controller.is_busy() {
        "Saving..."
    } else {
        "Enter: create   Tab: next field   Esc: cancel"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
    )));
    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Create New User")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent)),
    );
    f.render_widget(p, area);
}
