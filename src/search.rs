use tracing::debug;

use crate::app::{AppState, InputMode};

/// Query parameter for a typed search; an empty box means "no filter".
pub fn query_param(raw: &str) -> Option<&str> {
    if raw.is_empty() { None } else { Some(raw) }
}

/// Submit the search box: store it as the controller's query and queue a
/// server-side reload. Ignored while another request is in flight.
pub fn apply_search(app: &mut AppState) {
    let query = app.search_input.clone();
    match app.controller.begin_search(&query) {
        Ok(call) => {
            app.dispatch(call);
            app.selected_index = 0;
        }
        Err(err) => debug!(%err, "search not started"),
    }
    app.input_mode = InputMode::Normal;
}
