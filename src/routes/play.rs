//! `/api/play/*` and `/api/minigame/*` routes — everything that happens
//! between choosing an activity on the map and returning to it.

use serde::Deserialize;

use crate::error::ProgressError;
use crate::game::controller::LevelOutcome;
use crate::game::minigame::{GameId, MiniGameResult};
use crate::game::session::{Activity, Phase};
use crate::game::state;
use crate::routes::respond;
use crate::routes::util::{Params, error_span};

// ── POST /api/play/select ──────────────────────────────────────────

/// Handle POST /api/play/select
/// Body params:
///   - level={n}      → play a scenario level
///   - game={island}  → play an island's mini-game
pub fn handle_select_post(body: &str) -> String {
    let params = Params::from_body(body);
    state::with_state_mut(|app| {
        let outcome = match (params.text("game"), params.text("level")) {
            (Some(game), _) => match game.parse::<GameId>() {
                Ok(game) => app.controller.select_game(game),
                Err(e) => return error_span(&e),
            },
            (None, Some(level)) => match level.parse::<u32>() {
                Ok(level) => app.controller.select_level(level),
                Err(_) => Err(ProgressError::InvalidLevel(0)),
            },
            (None, None) => return error_span("Missing level or game parameter"),
        };
        respond(app, outcome)
    })
}

// ── POST /api/play/answer ──────────────────────────────────────────

/// Handle POST /api/play/answer
/// Body: level={n}&choice={index}&time_bonus={n}
pub fn handle_answer_post(body: &str) -> String {
    let params = Params::from_body(body);
    let (Some(level), Some(choice)) = (params.number::<u32>("level"), params.number::<usize>("choice"))
    else {
        return error_span("Missing level or choice parameter");
    };
    let time_bonus = params.number::<u32>("time_bonus").unwrap_or(0);
    state::with_state_mut(|app| {
        let outcome = app.controller.answer_scenario(level, choice, time_bonus);
        respond(app, outcome)
    })
}

// ── POST /api/play/complete ────────────────────────────────────────

/// Handle POST /api/play/complete
/// Body: level={n}&correct={bool}&time_bonus={n}&perfect={bool}
/// Direct level completion for activities that score themselves.
pub fn handle_complete_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(level) = params.number::<u32>("level") else {
        return error_span("Missing level parameter");
    };
    let outcome = LevelOutcome {
        correct: params.flag("correct"),
        time_bonus: params.number("time_bonus").unwrap_or(0),
        perfect: params.flag("perfect"),
    };
    state::with_state_mut(|app| {
        let result = app.controller.complete_level(level, outcome);
        respond(app, result)
    })
}

// ── POST /api/play/wrong ───────────────────────────────────────────

/// Handle POST /api/play/wrong
pub fn handle_wrong_post(_body: &str) -> String {
    state::with_state_mut(|app| {
        let outcome = app.controller.wrong_answer();
        respond(app, outcome)
    })
}

// ── POST /api/play/exit ────────────────────────────────────────────

/// Handle POST /api/play/exit
/// Always-available way back to the map, whatever the mini-game is doing.
pub fn handle_exit_post(_body: &str) -> String {
    state::with_state_mut(|app| {
        let outcome = app.controller.exit_to_selection();
        respond(app, outcome)
    })
}

// ── POST /api/play/dismiss ─────────────────────────────────────────

/// Handle POST /api/play/dismiss
pub fn handle_dismiss_post(_body: &str) -> String {
    state::with_state_mut(|app| {
        let outcome = app.controller.dismiss();
        respond(app, outcome)
    })
}

// ── POST /api/minigame/mount ───────────────────────────────────────

/// Handle POST /api/minigame/mount
/// Body: game={island}. Fired by the mini-game screen's host element on
/// load; returns the module's mount markup.
pub fn handle_mount_post(body: &str) -> String {
    let params = Params::from_body(body);
    let game = match params.text("game").map(str::parse::<GameId>) {
        Some(Ok(game)) => game,
        Some(Err(e)) => return error_span(&e),
        None => return error_span("Missing game parameter"),
    };
    state::with_state_mut(|app| {
        let phase = app.session().phase;
        match phase {
            Phase::Playing {
                activity: Activity::MiniGame { game: playing },
            } if playing == game => app.mount(game),
            _ => error_span(&ProgressError::NotPlaying.to_string()),
        }
    })
}

// ── POST /api/minigame/complete ────────────────────────────────────

/// JSON form of a completion: the contract object plus the island key.
#[derive(Deserialize)]
struct Completion {
    game: GameId,
    #[serde(flatten)]
    result: MiniGameResult,
}

/// Handle POST /api/minigame/complete
/// Body, either form-encoded:
///   game={island}&passed={bool}&score={n}&game_type={type}&accuracy={0..1}
/// or JSON: `{"game":"island1","passed":true,"score":300,"gameType":"scam-scanner"}`
///
/// The result is routed through the mounted module, which forwards it at
/// most once; duplicates and results for games that aren't mounted are
/// dropped and the current screen is re-rendered unchanged.
pub fn handle_minigame_complete_post(body: &str) -> String {
    let (game, raw) = match parse_completion(body) {
        Ok(parsed) => parsed,
        Err(e) => return error_span(&e),
    };
    state::with_state_mut(|app| match app.deliver(game, raw) {
        Some(result) => {
            let outcome = app.controller.complete_mini_game(game, &result);
            respond(app, outcome)
        }
        None => {
            log::warn!("{}: completion dropped", game);
            crate::screens::render(app.session())
        }
    })
}

fn parse_completion(body: &str) -> Result<(GameId, MiniGameResult), String> {
    if body.trim_start().starts_with('{') {
        let c: Completion =
            serde_json::from_str(body).map_err(|e| format!("Invalid completion JSON: {}", e))?;
        return Ok((c.game, c.result));
    }
    let params = Params::from_body(body);
    let game = params
        .text("game")
        .ok_or_else(|| "Missing game parameter".to_string())?
        .parse::<GameId>()?;
    Ok((
        game,
        MiniGameResult {
            passed: params.flag("passed"),
            score: params.number("score").unwrap_or(0.0),
            game_type: params
                .text("game_type")
                .or_else(|| params.text("gameType"))
                .unwrap_or(game.game_type())
                .to_string(),
            accuracy: params.number("accuracy"),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::routes::session::handle_start_post;

    fn reset_state() {
        state::init_state(GameConfig::default());
    }

    fn started() {
        reset_state();
        handle_start_post("name=Rex");
    }

    #[test]
    fn select_requires_a_target() {
        started();
        assert!(handle_select_post("").contains("Missing level or game"));
        assert!(handle_select_post("game=island9").contains("unknown game"));
        reset_state();
    }

    #[test]
    fn select_locked_level_shows_error() {
        started();
        let html = handle_select_post("level=4");
        assert!(html.contains("level 4 is locked"));
        assert!(!html.contains("localStorage"));
        reset_state();
    }

    #[test]
    fn answer_flow_scores_and_reviews() {
        started();
        let html = handle_select_post("level=1");
        assert!(html.contains("The Urgent Email"));

        let html = handle_answer_post("level=1&choice=1&time_bonus=2");
        assert!(html.contains("Scam spotted!"));
        assert!(html.contains("data-points=\"27\""));
        state::with_state(|app| {
            assert_eq!(app.session().score, 27);
            assert_eq!(app.session().current_level, 2);
        });

        let html = handle_dismiss_post("");
        assert!(html.contains("Password Peak"));
        reset_state();
    }

    #[test]
    fn wrong_answers_reach_game_over() {
        started();
        handle_wrong_post("");
        handle_wrong_post("");
        let html = handle_wrong_post("");
        assert!(html.contains("Game over"));
        let html = handle_wrong_post("");
        assert!(html.contains("the adventure is over"));
        state::with_state(|app| assert_eq!(app.session().lives, 0));
        reset_state();
    }

    #[test]
    fn complete_post_applies_outcome() {
        started();
        handle_complete_post("level=1&correct=true&time_bonus=2&perfect=true");
        state::with_state(|app| assert_eq!(app.session().score, 27));
        let html = handle_complete_post("level=11&correct=true");
        assert!(html.contains("level 11 does not exist"));
        reset_state();
    }

    #[test]
    fn mini_game_badge_awarded_once_through_routes() {
        started();
        let html = handle_select_post("game=island1");
        assert!(html.contains("/api/minigame/mount"));
        let mount = handle_mount_post("game=island1");
        assert!(mount.contains("data-game=\"scam-scanner\""));

        let html = handle_minigame_complete_post(
            r#"{"game":"island1","passed":true,"score":300,"gameType":"scam-scanner"}"#,
        );
        assert!(html.contains("Phish Finder"));
        assert!(html.contains("unmount('scam-scanner'"));

        // Stray second callback from the same run.
        let html = handle_minigame_complete_post("game=island1&passed=true&score=300");
        assert!(!html.contains("localStorage"));

        handle_dismiss_post("");
        handle_select_post("game=island1");
        handle_mount_post("game=island1");
        let html = handle_minigame_complete_post("game=island1&passed=true&score=300");
        assert!(!html.contains("Badge earned"));
        state::with_state(|app| {
            assert_eq!(app.session().earned_badges.len(), 1);
            assert_eq!(app.session().score, 700);
        });
        reset_state();
    }

    #[test]
    fn mount_only_for_the_game_being_played() {
        started();
        let html = handle_mount_post("game=island1");
        assert!(html.contains("nothing is being played"));
        reset_state();
    }

    #[test]
    fn exit_disposes_mounted_game() {
        started();
        handle_select_post("game=island1");
        handle_mount_post("game=island1");
        let html = handle_exit_post("");
        assert!(html.contains("unmount('scam-scanner', 'frame')"));
        assert!(html.contains("Phishing Lagoon"));
        state::with_state(|app| assert_eq!(app.mounted_game(), None));
        reset_state();
    }

    #[test]
    fn completion_parses_form_fields() {
        let (game, r) =
            parse_completion("game=island5&passed=on&score=12.5&accuracy=0.75").unwrap();
        assert_eq!(game, GameId::Island5);
        assert!(r.passed);
        assert_eq!(r.score, 12.5);
        assert_eq!(r.game_type, "message-sorter");
        assert_eq!(r.accuracy, Some(0.75));
        assert!(parse_completion("passed=true").is_err());
        assert!(parse_completion("{\"game\":1}").is_err());
    }

    #[test]
    fn badges_first_then_level_completions_finish_the_run() {
        started();
        for game in GameId::ALL {
            let key = game.key();
            handle_select_post(&format!("game={}", key));
            handle_mount_post(&format!("game={}", key));
            handle_minigame_complete_post(&format!("game={}&passed=false&score=0", key));
            handle_dismiss_post("");
        }
        for level in 1..10 {
            handle_complete_post(&format!("level={}&correct=true", level));
        }
        let html = handle_complete_post("level=10&correct=true");
        assert!(html.contains("Academy complete!"));
        assert!(html.contains("110 points"));
        assert!(html.contains("rank #6"));
        state::with_state(|app| assert_eq!(app.session().history.len(), 1));
        reset_state();
    }

    #[test]
    fn leaderboard_lists_finished_run_once() {
        started();
        for _ in 0..3 {
            handle_wrong_post("");
        }
        let html = crate::routes::screen::handle_leaderboard_get("");
        assert_eq!(html.matches("Rex").count(), 1);
        assert_eq!(html.matches("<tr").count(), 6);
        reset_state();
    }
}
