//! Fraud Detection Academy in-browser WASM core.
//!
//! Exports `init(config_json)` and `handle_request(method, path, query,
//! body)` for the page's HTMX bridge to call. Uses `matchit` for URL
//! routing — the same router engine that powers Axum.
//!
//! The progression controller (`game::controller`) is a pure state machine;
//! the route handlers are the orchestrator that mounts mini-games, forwards
//! their results, saves the session and renders the screen.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;
pub mod routes;
pub mod screens;

use config::GameConfig;

/// Install logging and the panic hook, then start from a fresh session
/// with the given config. Invalid config falls back to the defaults.
///
/// Call once before the page restores its saved session.
#[wasm_bindgen]
pub fn init(config_json: &str) {
    console_error_panic_hook::set_once();
    let parsed = GameConfig::from_json(config_json);
    let level = parsed
        .as_ref()
        .ok()
        .and_then(GameConfig::level)
        .unwrap_or(log::Level::Info);
    let _ = console_log::init_with_level(level);

    let config = parsed.unwrap_or_else(|e| {
        log::warn!("{}; using default config", e);
        GameConfig::default()
    });
    game::state::init_state(config);
    log::info!("fraud-academy: initialized");
}

/// Process an HTTP-like request and return an HTML fragment.
///
/// # Arguments
/// * `method` — HTTP method ("GET" or "POST")
/// * `path`   — URL path (e.g., "/api/play/select")
/// * `query`  — Query string, empty for POST requests
/// * `body`   — Form-encoded or JSON body, empty for GET requests
///
/// # Returns
/// An HTML fragment for HTMX to swap in, or the raw session JSON for
/// `GET /api/session/state`.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    router.insert("/api/screen", "screen").ok();
    router.insert("/api/leaderboard", "leaderboard").ok();

    router.insert("/api/session/start", "session_start").ok();
    router.insert("/api/session/reset", "session_reset").ok();
    router.insert("/api/session/state", "session_state").ok();
    router.insert("/api/session/restore", "session_restore").ok();
    router.insert("/api/session/export", "session_export").ok();
    router.insert("/api/session/import", "session_import").ok();

    router.insert("/api/play/select", "play_select").ok();
    router.insert("/api/play/answer", "play_answer").ok();
    router.insert("/api/play/complete", "play_complete").ok();
    router.insert("/api/play/wrong", "play_wrong").ok();
    router.insert("/api/play/exit", "play_exit").ok();
    router.insert("/api/play/dismiss", "play_dismiss").ok();

    router.insert("/api/minigame/mount", "minigame_mount").ok();
    router.insert("/api/minigame/complete", "minigame_complete").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("screen", "GET") => routes::screen::handle_screen_get(query),
            ("leaderboard", "GET") => routes::screen::handle_leaderboard_get(query),

            ("session_start", "POST") => routes::session::handle_start_post(body),
            ("session_reset", "POST") => routes::session::handle_reset_post(body),
            ("session_state", "GET") => routes::session::handle_state_get(query),
            ("session_restore", "POST") => routes::session::handle_restore_post(body),
            ("session_export", "GET") => routes::session::handle_export_get(query),
            ("session_import", "POST") => routes::session::handle_import_post(body),

            ("play_select", "POST") => routes::play::handle_select_post(body),
            ("play_answer", "POST") => routes::play::handle_answer_post(body),
            ("play_complete", "POST") => routes::play::handle_complete_post(body),
            ("play_wrong", "POST") => routes::play::handle_wrong_post(body),
            ("play_exit", "POST") => routes::play::handle_exit_post(body),
            ("play_dismiss", "POST") => routes::play::handle_dismiss_post(body),

            ("minigame_mount", "POST") => routes::play::handle_mount_post(body),
            ("minigame_complete", "POST") => routes::play::handle_minigame_complete_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-700">404: route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-700">405: method not allowed</span>"#.to_string()
}
