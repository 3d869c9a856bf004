//! `/api/session/*` routes — starting, resetting and persisting the session.

use crate::game::persist;
use crate::game::state;
use crate::routes::respond;
use crate::routes::util::{Params, error_span};
use crate::screens;

// ── POST /api/session/start ────────────────────────────────────────

/// Handle POST /api/session/start
/// Body: name={dog name}
pub fn handle_start_post(body: &str) -> String {
    let params = Params::from_body(body);
    let name = params.get("name").unwrap_or("");
    state::with_state_mut(|app| {
        let outcome = app.controller.start(name);
        respond(app, outcome)
    })
}

// ── POST /api/session/reset ────────────────────────────────────────

/// Handle POST /api/session/reset
/// "New adventure": disposes any mounted game and returns to the intro.
pub fn handle_reset_post(_body: &str) -> String {
    state::with_state_mut(|app| {
        let mut html = app.unmount();
        app.controller.reset();
        html.push_str(&respond(app, Ok::<(), _>(())));
        html
    })
}

// ── GET /api/session/state ─────────────────────────────────────────

/// Handle GET /api/session/state
/// Returns the session JSON exactly as it is stored in localStorage.
pub fn handle_state_get(_query: &str) -> String {
    state::with_state(|app| persist::save(app.session()))
}

// ── POST /api/session/restore ──────────────────────────────────────

/// Handle POST /api/session/restore
/// Body: the stored JSON (raw, or as `state=`). Called once on page load.
/// Corrupt or missing data silently becomes a fresh session.
pub fn handle_restore_post(body: &str) -> String {
    let json = if body.trim_start().starts_with('{') {
        body.to_string()
    } else {
        Params::from_body(body).get("state").unwrap_or("").to_string()
    };
    let config = state::with_state(|app| app.config().clone());
    let session = persist::load(&json, &config);
    let mut html = state::replace_session(session);
    state::with_state(|app| html.push_str(&screens::render(app.session())));
    html
}

// ── GET /api/session/export ────────────────────────────────────────

/// Handle GET /api/session/export
/// Returns a <script> that downloads the session as a save code file.
pub fn handle_export_get(_query: &str) -> String {
    let code = state::with_state(|app| persist::encode_save_code(app.session()));
    format!(
        r#"<script>
(function() {{
  var b = new Blob(['{code}'], {{type: 'text/plain'}});
  var a = document.createElement('a');
  a.href = URL.createObjectURL(b);
  a.download = 'fraud-academy-save.txt';
  a.click();
  URL.revokeObjectURL(a.href);
}})();
</script>"#,
        code = code
    )
}

// ── POST /api/session/import ───────────────────────────────────────

/// Handle POST /api/session/import
/// Body: code={save code}. A bad code is reported, the session is kept.
pub fn handle_import_post(body: &str) -> String {
    let params = Params::from_body(body);
    let code = params.get("code").unwrap_or(body.trim());
    let config = state::with_state(|app| app.config().clone());
    match persist::decode_save_code(code, &config) {
        Ok(session) => {
            let mut html = state::replace_session(session);
            log::info!("session imported from save code");
            html.push_str(r#"<span class="text-emerald-600 text-sm">Save imported successfully</span>"#);
            state::with_state_mut(|app| html.push_str(&respond(app, Ok::<(), _>(()))));
            html
        }
        Err(e) => {
            log::warn!("save code rejected: {}", e);
            error_span(&format!("Import failed: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::minigame::GameId;
    use crate::game::session::Phase;

    fn reset_state() {
        state::init_state(GameConfig::default());
    }

    #[test]
    fn start_moves_to_map_and_persists() {
        reset_state();
        let html = handle_start_post("name=Rex");
        assert!(html.contains("Phishing Lagoon"));
        assert!(html.contains("localStorage.setItem"));
        state::with_state(|app| assert_eq!(app.session().dog_name, "Rex"));
        reset_state();
    }

    #[test]
    fn start_without_name_shows_error_and_skips_save() {
        reset_state();
        let html = handle_start_post("name=");
        assert!(html.contains("name must be between"));
        assert!(!html.contains("localStorage"));
        reset_state();
    }

    #[test]
    fn reset_returns_to_intro() {
        reset_state();
        handle_start_post("name=Rex");
        let html = handle_reset_post("");
        assert!(html.contains("/api/session/start"));
        state::with_state(|app| assert_eq!(app.session().phase, Phase::Intro));
        reset_state();
    }

    #[test]
    fn state_and_restore_round_trip() {
        reset_state();
        handle_start_post("name=Rex");
        let json = handle_state_get("");
        assert!(json.contains("\"dog_name\":\"Rex\""));

        reset_state();
        let html = handle_restore_post(&json);
        assert!(html.contains("Rex"));
        state::with_state(|app| assert_eq!(app.session().phase, Phase::Selecting));
        reset_state();
    }

    #[test]
    fn restore_corrupt_state_starts_fresh() {
        reset_state();
        handle_start_post("name=Rex");
        let html = handle_restore_post("{ not json");
        assert!(html.contains("Name your detective pup"));
        state::with_state(|app| assert!(!app.session().has_started()));
        reset_state();
    }

    #[test]
    fn export_then_import() {
        reset_state();
        handle_start_post("name=Rex");
        let script = handle_export_get("");
        assert!(script.contains("fraud-academy-save.txt"));
        let code = state::with_state(|app| persist::encode_save_code(app.session()));

        reset_state();
        let html = handle_import_post(&format!("code={}", code));
        assert!(html.contains("imported successfully"));
        state::with_state(|app| assert_eq!(app.session().dog_name, "Rex"));
        reset_state();
    }

    #[test]
    fn import_bad_code_keeps_session() {
        reset_state();
        handle_start_post("name=Rex");
        let html = handle_import_post("code=%%%");
        assert!(html.contains("Import failed"));
        state::with_state(|app| assert_eq!(app.session().dog_name, "Rex"));
        reset_state();
    }

    fn mount_island1() {
        handle_start_post("name=Rex");
        crate::routes::play::handle_select_post("game=island1");
        crate::routes::play::handle_mount_post("game=island1");
        state::with_state(|app| assert_eq!(app.mounted_game(), Some(GameId::Island1)));
    }

    #[test]
    fn import_mid_game_tears_down_page_loop() {
        reset_state();
        handle_start_post("name=Rex");
        let code = state::with_state(|app| persist::encode_save_code(app.session()));
        mount_island1();

        let html = handle_import_post(&format!("code={}", code));
        assert!(html.contains("unmount('scam-scanner', 'frame')"));
        assert!(html.contains("imported successfully"));
        state::with_state(|app| assert_eq!(app.mounted_game(), None));
        reset_state();
    }

    #[test]
    fn restore_mid_game_tears_down_page_loop() {
        reset_state();
        handle_start_post("name=Rex");
        let json = handle_state_get("");
        mount_island1();

        let html = handle_restore_post(&json);
        assert!(html.contains("unmount('scam-scanner', 'frame')"));
        state::with_state(|app| {
            assert_eq!(app.mounted_game(), None);
            assert_eq!(app.session().phase, Phase::Selecting);
        });
        reset_state();
    }
}
