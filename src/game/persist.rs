//! Session persistence.
//!
//! The page keeps one localStorage key holding the session as JSON. The
//! orchestrator calls [`save`] after every mutation and [`load`] once on page
//! load; the controller never touches storage itself.
//!
//! A "save code" is the same JSON, URL-safe base64 encoded, for moving a
//! session between browsers by copy/paste or file download.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::config::GameConfig;
use crate::game::session::{Activity, Phase, Session};

/// Serialize the session for storage.
pub fn save(session: &Session) -> String {
    serde_json::to_string(session).unwrap_or_else(|e| {
        log::error!("session serialization failed: {}", e);
        String::new()
    })
}

/// Parse a stored session. Missing, corrupt or inconsistent data yields a
/// fresh session instead of an error.
pub fn load(json: &str, config: &GameConfig) -> Session {
    if json.trim().is_empty() {
        return Session::new(config.max_lives);
    }
    match try_load(json, config) {
        Ok(session) => session,
        Err(e) => {
            log::warn!("discarding saved session: {}", e);
            Session::new(config.max_lives)
        }
    }
}

fn try_load(json: &str, config: &GameConfig) -> Result<Session, String> {
    let mut session: Session =
        serde_json::from_str(json).map_err(|e| format!("invalid session JSON: {}", e))?;
    session.validate(config.max_lives)?;

    // A mounted mini-game doesn't survive a reload.
    if let Phase::Playing {
        activity: Activity::MiniGame { .. },
    } = session.phase
    {
        session.phase = Phase::Selecting;
    }
    Ok(session)
}

/// JavaScript that writes the session under the configured key.
///
/// The JSON is embedded as a JS string literal; `</` is escaped so the
/// payload can never close the surrounding `<script>` tag.
pub fn persist_script(session: &Session, config: &GameConfig) -> String {
    let json = save(session);
    let literal = serde_json::to_string(&json).unwrap_or_else(|_| "\"\"".to_string());
    let key = serde_json::to_string(&config.storage_key).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "<script>try {{ localStorage.setItem({}, {}); }} catch (e) {{}}</script>",
        key.replace("</", "<\\/"),
        literal.replace("</", "<\\/")
    )
}

pub fn encode_save_code(session: &Session) -> String {
    URL_SAFE_NO_PAD.encode(save(session))
}

/// Decode a save code. Unlike [`load`], a bad code is reported to the
/// player rather than silently replaced.
pub fn decode_save_code(code: &str, config: &GameConfig) -> Result<Session, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(code.trim())
        .map_err(|e| format!("base64 decode error: {}", e))?;
    let json = String::from_utf8(bytes).map_err(|e| format!("save code is not text: {}", e))?;
    try_load(&json, config)
}
