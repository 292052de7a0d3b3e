//! Application state types and entry glue.
//!
//! [`AppState`] wraps the [`UserListController`] with what only the terminal
//! front-end needs: input mode, row selection, the focused form field, the
//! search box, theme and keymap. Remote calls started by key handlers are
//! queued in [`AppState::outbox`] and shipped to the backend worker by the
//! event loop (re-exported as `run`).
//!
pub mod config;
pub mod keymap;
pub mod theme;
pub mod update;

use std::path::PathBuf;
use std::time::Instant;

use crate::controller::UserListController;
use crate::remote::{RemoteCall, UserField, UserRecord};

use keymap::Keymap;
use theme::Theme;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Table navigation through the keymap.
    Normal,
    /// Typing into the search box.
    Search,
    /// Inline editing of the selected row.
    EditRow,
    /// Filling the create form.
    CreateForm,
    /// Help dialog open.
    Help,
}

/// Everything the event loop and renderers read or mutate.
pub struct AppState {
    pub started_at: Instant,
    pub controller: UserListController,
    /// Index into the visible slice.
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub search_input: String,
    pub focused_field: UserField,
    pub theme: Theme,
    pub keymap: Keymap,
    /// Calls accepted by the controller and not yet handed to the worker.
    pub outbox: Vec<RemoteCall>,
    pub help_scroll: u16,
}

impl AppState {
    /// Fresh state with an empty controller, in Normal mode.
    ///
    /// # Arguments
    ///
    /// * `theme` - Palette used by every renderer
    /// * `keymap` - Bindings resolved in Normal mode
    pub fn new(theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            controller: UserListController::new(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            focused_field: UserField::Name,
            theme,
            keymap,
            outbox: Vec::new(),
            help_scroll: 0,
        }
    }

    /// Queue a call the controller accepted; the event loop submits it to
    /// the worker on its next iteration.
    pub fn dispatch(&mut self, call: RemoteCall) {
        self.outbox.push(call);
    }

    /// The highlighted row of the visible slice.
    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.controller.visible().get(self.selected_index)
    }

    /// Keep the selection inside the visible slice after it changed.
    pub fn clamp_selection(&mut self) {
        let len = self.controller.visible().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Leave a form mode whose draft the controller has closed.
    pub fn sync_mode(&mut self) {
        let closed = match self.input_mode {
            InputMode::EditRow => self.controller.edit_draft().is_none(),
            InputMode::CreateForm => self.controller.create_draft().is_none(),
            _ => false,
        };
        if closed {
            self.input_mode = InputMode::Normal;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::mocha(), Keymap::default())
    }
}

/// Find `name` in the per-user config directory
/// (`$XDG_CONFIG_HOME/crude-manager` or `~/.config/crude-manager`).
pub fn config_file_read_path(name: &str) -> Option<String> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    let candidate = base.join("crude-manager").join(name);
    candidate
        .is_file()
        .then(|| candidate.to_string_lossy().into_owned())
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
