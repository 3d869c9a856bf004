//! `GET /api/screen` and `GET /api/leaderboard`.

use crate::game::state;
use crate::screens;

/// Handle GET /api/screen
/// Returns the screen for the current phase. Used on page load and by the
/// leaderboard's back button.
pub fn handle_screen_get(_query: &str) -> String {
    state::with_state(|app| screens::render(app.session()))
}

/// Handle GET /api/leaderboard
pub fn handle_leaderboard_get(_query: &str) -> String {
    state::with_state(|app| screens::render_leaderboard(app.session()))
}
