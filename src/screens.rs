//! Screen rendering.
//!
//! [`Screen::from_session`] is the whole navigation policy: one phase, one
//! screen. Rendering reads the session and the static tables only, so the
//! same session always produces the same markup.

use crate::game::leaderboard;
use crate::game::levels::{self, ISLANDS};
use crate::game::minigame::GameId;
use crate::game::session::{Activity, Phase, Session};
use crate::routes::util::{error_span, escape_html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intro,
    Map,
    Scenario { level: u32, mistakes: u32 },
    MiniGame { game: GameId },
    Review { level: u32, points: i32, correct: bool },
    Badge { game: GameId },
    Completed,
    GameOver,
}

impl Screen {
    pub fn from_session(session: &Session) -> Self {
        match session.phase {
            Phase::Intro => Screen::Intro,
            Phase::Selecting => Screen::Map,
            Phase::Playing {
                activity: Activity::Scenario { level, mistakes },
            } => Screen::Scenario { level, mistakes },
            Phase::Playing {
                activity: Activity::MiniGame { game },
            } => Screen::MiniGame { game },
            Phase::Reviewing {
                level,
                points,
                correct,
            } => Screen::Review {
                level,
                points,
                correct,
            },
            Phase::BadgeAwarded { game } => Screen::Badge { game },
            Phase::Completed => Screen::Completed,
            Phase::GameOver => Screen::GameOver,
        }
    }
}

/// Render the screen for the session's current phase.
pub fn render(session: &Session) -> String {
    render_with_error(session, None)
}

/// Same as [`render`], with a rejected action's message at the top.
pub fn render_with_error(session: &Session, error: Option<&str>) -> String {
    let screen = Screen::from_session(session);
    let mut html = String::with_capacity(4096);
    html.push_str(r#"<div id="screen" class="p-4 text-slate-800">"#);
    if let Some(message) = error {
        html.push_str(&error_span(message));
    }
    if !matches!(screen, Screen::Intro) {
        html.push_str(&render_hud(session));
    }
    let body = match screen {
        Screen::Intro => render_intro(),
        Screen::Map => render_map(session),
        Screen::Scenario { level, mistakes } => render_scenario(level, mistakes),
        Screen::MiniGame { game } => render_minigame(game),
        Screen::Review {
            level,
            points,
            correct,
        } => render_review(level, points, correct),
        Screen::Badge { game } => render_badge(game),
        Screen::Completed => render_completed(session),
        Screen::GameOver => render_game_over(session),
    };
    html.push_str(&body);
    html.push_str("</div>");
    html
}

fn render_hud(session: &Session) -> String {
    let hearts: String = "\u{2764}".repeat(session.lives as usize);
    let island = levels::island(session.current_island());
    format!(
        r#"<div id="hud" class="flex justify-between text-sm mb-3"><span class="font-bold">{}</span><span>{}</span><span data-score="{}">Score {}</span><span class="text-red-600" data-lives="{}">{}</span></div>"#,
        escape_html(&session.dog_name),
        island.name,
        session.score,
        session.score,
        session.lives,
        hearts
    )
}

fn render_intro() -> String {
    let mut h = String::with_capacity(1024);
    h.push_str(r#"<div class="text-center">"#);
    h.push_str(r#"<p class="text-2xl font-bold mb-2">Fraud Detection Academy</p>"#);
    h.push_str(r#"<p class="text-sm text-slate-500 mb-4">Name your detective pup to begin</p>"#);
    h.push_str(r##"<form hx-post="/api/session/start" hx-target="#screen" hx-swap="outerHTML">"##);
    h.push_str(r#"<input name="name" maxlength="24" required class="border rounded px-2 py-1 mr-2" placeholder="Rex">"#);
    h.push_str(r#"<button class="bg-emerald-600 text-white px-3 py-1 rounded">Start adventure</button>"#);
    h.push_str("</form>");
    h.push_str(&leaderboard_link());
    h.push_str("</div>");
    h
}

fn render_map(session: &Session) -> String {
    let mut h = String::with_capacity(3072);
    h.push_str(r#"<div class="grid grid-cols-1 gap-2">"#);
    for island in &ISLANDS {
        let open = session.is_game_unlocked(island.id);
        let earned = session.earned_badges.contains(&island.id);
        let border = if open { "border-emerald-400" } else { "border-slate-200 opacity-60" };
        h.push_str(&format!(
            r#"<div class="border rounded-lg p-2 {}" data-island="{}">"#,
            border, island.id
        ));
        h.push_str(&format!(
            r#"<p class="font-bold">{} {}</p>"#,
            island.name,
            if earned { island.badge.icon } else { "" }
        ));
        h.push_str(r#"<div class="flex flex-wrap gap-1 mt-1">"#);
        for &level in island.levels {
            h.push_str(&level_button(session, level));
        }
        if open {
            h.push_str(&format!(
                r##"<button class="text-xs bg-amber-500 text-white px-2 py-0.5 rounded" hx-post="/api/play/select" hx-vals='{{"game":"{}"}}' hx-target="#screen" hx-swap="outerHTML">Play {}</button>"##,
                island.id,
                island.id.game_type()
            ));
        } else {
            h.push_str(r#"<span class="text-xs text-slate-400 px-2 py-0.5">Locked</span>"#);
        }
        h.push_str("</div></div>");
    }
    h.push_str("</div>");
    h.push_str(&leaderboard_link());
    h
}

fn level_button(session: &Session, level: u32) -> String {
    let title = levels::level(level).map(|l| l.title).unwrap_or("");
    if !session.is_level_unlocked(level) {
        return format!(
            r#"<span class="text-xs text-slate-300 border rounded px-2 py-0.5">{} &middot; Locked</span>"#,
            title
        );
    }
    let done = session.completed_levels.contains(&level);
    format!(
        r##"<button class="text-xs border rounded px-2 py-0.5 {}" hx-post="/api/play/select" hx-vals='{{"level":"{}"}}' hx-target="#screen" hx-swap="outerHTML">{}{}</button>"##,
        if done { "bg-emerald-100" } else { "bg-white" },
        level,
        if done { "\u{2713} " } else { "" },
        title
    )
}

fn render_scenario(level: u32, mistakes: u32) -> String {
    let Some(def) = levels::level(level) else {
        return String::new();
    };
    let mut h = String::with_capacity(2048);
    h.push_str(&format!(
        r#"<div data-level="{}"><p class="text-lg font-bold">{}</p><p class="text-sm mb-3">{}</p>"#,
        level, def.title, def.prompt
    ));
    if mistakes > 0 {
        h.push_str(&format!(
            r#"<p class="text-xs text-red-600 mb-2">Not quite. Wrong picks so far: {}</p>"#,
            mistakes
        ));
    }
    h.push_str(r#"<div class="grid grid-cols-1 gap-1">"#);
    for (i, choice) in def.choices.iter().enumerate() {
        h.push_str(&format!(
            r##"<button class="border rounded px-2 py-1 text-left bg-white hover:bg-slate-50" hx-post="/api/play/answer" hx-vals='{{"level":"{}","choice":"{}"}}' hx-include="#time-bonus" hx-target="#screen" hx-swap="outerHTML">{}</button>"##,
            level, i, choice.text
        ));
    }
    h.push_str("</div>");
    h.push_str(r#"<input type="hidden" id="time-bonus" name="time_bonus" value="0">"#);
    h.push_str(&exit_button());
    h.push_str("</div>");
    h
}

fn render_minigame(game: GameId) -> String {
    let island = levels::island(game);
    let mut h = String::with_capacity(1024);
    h.push_str(&format!(
        r#"<p class="text-lg font-bold mb-2">{}: {}</p>"#,
        island.name,
        game.game_type()
    ));
    h.push_str(&format!(
        r#"<div id="minigame-host" data-game="{}" hx-post="/api/minigame/mount" hx-vals='{{"game":"{}"}}' hx-trigger="load" hx-swap="innerHTML"></div>"#,
        game, game
    ));
    h.push_str(&exit_button());
    h
}

fn render_review(level: u32, points: i32, correct: bool) -> String {
    let title = levels::level(level).map(|l| l.title).unwrap_or("");
    let (headline, color) = if correct {
        ("Scam spotted!", "text-emerald-600")
    } else {
        ("That one fooled you", "text-red-600")
    };
    format!(
        r#"<div class="text-center"><p class="text-lg font-bold {}">{}</p><p class="text-sm">{}</p><p class="text-2xl my-2" data-points="{}">{:+} points</p>{}</div>"#,
        color,
        headline,
        title,
        points,
        points,
        continue_button()
    )
}

fn render_badge(game: GameId) -> String {
    let badge = levels::badge(game);
    format!(
        r#"<div class="text-center"><p class="text-5xl">{}</p><p class="text-lg font-bold">Badge earned: {}</p><p class="text-sm text-slate-500">{}</p>{}</div>"#,
        badge.icon,
        badge.name,
        badge.description,
        continue_button()
    )
}

fn render_completed(session: &Session) -> String {
    let rank = leaderboard::player_rank(session).unwrap_or(0);
    format!(
        r#"<div class="text-center"><p class="text-2xl font-bold">Academy complete!</p><p class="text-sm">{} finished with {} points and {} badges (rank #{}).</p>{}{}</div>"#,
        escape_html(&session.dog_name),
        session.score,
        session.earned_badges.len(),
        rank,
        leaderboard_link(),
        new_adventure_button()
    )
}

fn render_game_over(session: &Session) -> String {
    format!(
        r#"<div class="text-center"><p class="text-2xl font-bold text-red-600">Game over</p><p class="text-sm">Out of lives with {} points.</p>{}</div>"#,
        session.score,
        new_adventure_button()
    )
}

/// Leaderboard panel. Not a phase: reachable from any screen.
pub fn render_leaderboard(session: &Session) -> String {
    let mut h = String::with_capacity(2048);
    h.push_str(r#"<div id="leaderboard" class="p-4"><p class="text-lg font-bold text-center mb-2">Leaderboard</p><table class="w-full text-sm">"#);
    for row in leaderboard::standings(session) {
        let class = if row.is_player { "font-bold bg-amber-50" } else { "" };
        h.push_str(&format!(
            r#"<tr class="{}"><td>#{}</td><td>{}</td><td class="text-right">{}</td></tr>"#,
            class,
            row.rank,
            escape_html(&row.name),
            row.score
        ));
    }
    h.push_str("</table>");
    h.push_str(r##"<button class="text-xs underline mt-2" hx-get="/api/screen" hx-target="#leaderboard" hx-swap="outerHTML">Back</button>"##);
    h.push_str("</div>");
    h
}

fn exit_button() -> String {
    r##"<button class="text-xs text-slate-500 underline mt-3" hx-post="/api/play/exit" hx-target="#screen" hx-swap="outerHTML">Back to map</button>"##.to_string()
}

fn continue_button() -> String {
    r##"<button class="bg-emerald-600 text-white px-3 py-1 rounded" hx-post="/api/play/dismiss" hx-target="#screen" hx-swap="outerHTML">Continue</button>"##.to_string()
}

fn new_adventure_button() -> String {
    r##"<button class="bg-red-600 text-white px-3 py-1 rounded mt-2" hx-post="/api/session/reset" hx-target="#screen" hx-swap="outerHTML">New adventure</button>"##.to_string()
}

fn leaderboard_link() -> String {
    r##"<button class="text-xs underline mt-3 block mx-auto" hx-get="/api/leaderboard" hx-target="#screen" hx-swap="outerHTML">Leaderboard</button>"##.to_string()
}
