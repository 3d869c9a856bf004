//! Route handlers. Each takes the raw query or body and returns markup.
//!
//! Handlers only forward events to the controller and re-render; scoring
//! and badge decisions all live in `game::controller`.

pub mod play;
pub mod screen;
pub mod session;
pub mod util;

use crate::error::ProgressError;
use crate::game::persist;
use crate::game::session::{Activity, Phase};
use crate::game::state::AppState;
use crate::screens;

/// Render the outcome of a controller operation.
///
/// On success the screen is followed by the persist script (the explicit
/// save after every mutation). On failure the unchanged screen is shown
/// with the error on top and nothing is saved.
pub(crate) fn respond<T>(app: &mut AppState, outcome: Result<T, ProgressError>) -> String {
    let mut html = release_stale_game(app);
    match outcome {
        Ok(_) => {
            html.push_str(&screens::render(app.session()));
            html.push_str(&persist::persist_script(app.session(), app.config()));
        }
        Err(e) => {
            log::debug!("rejected: {}", e);
            html.push_str(&screens::render_with_error(app.session(), Some(&e.to_string())));
        }
    }
    html
}

/// Dispose the mounted mini-game once the session has moved off it.
fn release_stale_game(app: &mut AppState) -> String {
    let Some(mounted) = app.mounted_game() else {
        return String::new();
    };
    let phase = app.session().phase;
    match phase {
        Phase::Playing {
            activity: Activity::MiniGame { game },
        } if game == mounted => String::new(),
        _ => app.unmount(),
    }
}
