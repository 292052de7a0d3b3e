use std::time::Duration;

use anyhow::{Context as _, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::remote::{CallOutcome, UserField};
use crate::search::apply_search;
use crate::ui;
use crate::worker::WorkerHandle;

/// What the loop should do after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    worker: &WorkerHandle,
) -> Result<()> {
    // initial unfiltered load
    if let Ok(call) = app.controller.begin_load(None) {
        app.dispatch(call);
    }

    loop {
        for call in app.outbox.drain(..) {
            worker.submit(call).context("submit remote call")?;
        }
        while let Some(outcome) = worker.try_recv() {
            apply_outcome(app, outcome);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key) == Flow::Quit
        {
            break;
        }
    }

    info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

/// Feed a finished remote call back into the controller and fix up the view.
pub fn apply_outcome(app: &mut AppState, outcome: CallOutcome) {
    if let Err(failure) = app.controller.complete(outcome) {
        debug!(%failure, "remote call completed with failure");
    }
    app.clamp_selection();
    app.sync_mode();
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => match key.code {
            KeyCode::Enter => apply_search(app),
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                app.search_input.pop();
            }
            KeyCode::Char(c) => app.search_input.push(c),
            _ => {}
        },
        InputMode::EditRow => handle_edit_key(app, key.code),
        InputMode::CreateForm => handle_create_key(app, key.code),
        InputMode::Help => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.help_scroll = 0;
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => app.help_scroll = app.help_scroll.saturating_add(1),
            _ => {}
        },
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::Ignore => {}
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::OpenHelp => app.input_mode = InputMode::Help,
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.controller.visible().len() {
                app.selected_index += 1;
            }
        }
        // while a call is in flight the actions below are disabled
        _ if app.controller.is_busy() => {}
        KeyAction::NewUser => {
            if app.controller.begin_create().is_ok() {
                app.focused_field = UserField::Name;
                app.input_mode = InputMode::CreateForm;
            }
        }
        KeyAction::EditSelection => {
            if let Some(user) = app.selected_user().cloned()
                && app.controller.begin_edit(&user).is_ok()
            {
                app.focused_field = UserField::Name;
                app.input_mode = InputMode::EditRow;
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(id) = app.selected_user().map(|u| u.id)
                && let Ok(call) = app.controller.begin_remove(id)
            {
                app.dispatch(call);
            }
        }
        KeyAction::Reload => {
            let query = app.controller.search_query().to_string();
            if let Ok(call) = app.controller.begin_load(Some(&query)) {
                app.dispatch(call);
            }
        }
    }
    Flow::Continue
}

fn handle_edit_key(app: &mut AppState, code: KeyCode) {
    // the form is frozen until the pending commit completes
    if app.controller.is_busy() {
        return;
    }
    let field = app.focused_field;
    match code {
        KeyCode::Esc => {
            app.controller.cancel_edit();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::Down => app.focused_field = field.next(),
        KeyCode::BackTab | KeyCode::Up => app.focused_field = field.prev(),
        KeyCode::Enter => {
            if let Ok(call) = app.controller.begin_commit_edit() {
                app.dispatch(call);
            }
        }
        KeyCode::Backspace | KeyCode::Char(_) => {
            let Some(draft) = app.controller.edit_draft() else {
                app.input_mode = InputMode::Normal;
                return;
            };
            let value = edited(draft.field(field), code);
            let _ = app.controller.update_draft_field(field, value);
        }
        _ => {}
    }
}

fn handle_create_key(app: &mut AppState, code: KeyCode) {
    // the form is frozen until the pending commit completes
    if app.controller.is_busy() {
        return;
    }
    let field = app.focused_field;
    match code {
        KeyCode::Esc => {
            app.controller.cancel_create();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::Down => app.focused_field = field.next(),
        KeyCode::BackTab | KeyCode::Up => app.focused_field = field.prev(),
        KeyCode::Enter => {
            if let Ok(call) = app.controller.begin_commit_create() {
                app.dispatch(call);
            }
        }
        KeyCode::Backspace | KeyCode::Char(_) => {
            let Some(draft) = app.controller.create_draft() else {
                app.input_mode = InputMode::Normal;
                return;
            };
            let value = edited(draft.field(field), code);
            let _ = app.controller.update_create_field(field, value);
        }
        _ => {}
    }
}

/// Apply a typing key to a field value.
fn edited(current: &str, code: KeyCode) -> String {
    let mut value = current.to_string();
    match code {
        KeyCode::Backspace => {
            value.pop();
        }
        KeyCode::Char(c) => value.push(c),
        _ => {}
    }
    value
}
