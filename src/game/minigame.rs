//! Mini-game modules and their registry.
//!
//! The playable part of every mini-game (canvas loop, countdown, drag and
//! drop) runs in the page. On the Rust side each island's game is a
//! [`MiniGame`] handle: it produces the mount markup, owns the completion
//! callback the orchestrator injects, forwards the page's raw result exactly
//! once, and produces the teardown markup that stops the page-side loop.
//!
//! `registry::create` is the only way to build one, so the set of games is
//! closed over [`GameId`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One mini-game per island. Serialized as `"island1"` .. `"island6"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Island1,
    Island2,
    Island3,
    Island4,
    Island5,
    Island6,
}

impl GameId {
    pub const ALL: [GameId; 6] = [
        GameId::Island1,
        GameId::Island2,
        GameId::Island3,
        GameId::Island4,
        GameId::Island5,
        GameId::Island6,
    ];

    /// Position in [`GameId::ALL`] and in the island table.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            GameId::Island1 => "island1",
            GameId::Island2 => "island2",
            GameId::Island3 => "island3",
            GameId::Island4 => "island4",
            GameId::Island5 => "island5",
            GameId::Island6 => "island6",
        }
    }

    /// The `gameType` tag the page-side module reports.
    pub fn game_type(self) -> &'static str {
        match self {
            GameId::Island1 => "scam-scanner",
            GameId::Island2 => "password-builder",
            GameId::Island3 => "payment-defender",
            GameId::Island4 => "qr-inspector",
            GameId::Island5 => "message-sorter",
            GameId::Island6 => "identity-guard",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GameId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::ALL
            .into_iter()
            .find(|g| g.key() == s)
            .ok_or_else(|| format!("unknown game: {}", s))
    }
}

/// What a mini-game reports when it finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniGameResult {
    pub passed: bool,
    pub score: f64,
    #[serde(alias = "gameType")]
    pub game_type: String,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// Injected by the orchestrator; `FnOnce` so a game can only complete once.
pub type CompletionCallback = Box<dyn FnOnce(GameId, MiniGameResult)>;

pub trait MiniGame {
    fn id(&self) -> GameId;

    /// Mark the game running and return the markup that mounts it.
    fn start(&mut self) -> String;

    fn on_complete(&mut self, callback: CompletionCallback);

    /// Deliver the page's result. Returns `false` when the result was
    /// dropped: already completed, disposed, or never started.
    fn report(&mut self, result: MiniGameResult) -> bool;

    /// Stop the game and return markup that cancels its page-side loop.
    fn dispose(&mut self) -> String;

    fn is_running(&self) -> bool;
}

/// Shared lifecycle bookkeeping for every game kind.
struct Lifecycle {
    id: GameId,
    running: bool,
    callback: Option<CompletionCallback>,
}

impl Lifecycle {
    fn new(id: GameId) -> Self {
        Self {
            id,
            running: false,
            callback: None,
        }
    }

    fn deliver(&mut self, result: MiniGameResult) -> bool {
        if !self.running {
            log::warn!("{}: result reported while not running, ignored", self.id);
            return false;
        }
        let Some(callback) = self.callback.take() else {
            log::warn!("{}: duplicate completion ignored", self.id);
            return false;
        };
        self.running = false;
        callback(self.id, self.normalise(result));
        true
    }

    fn normalise(&self, mut result: MiniGameResult) -> MiniGameResult {
        if !result.score.is_finite() || result.score < 0.0 {
            result.score = 0.0;
        }
        result.accuracy = result
            .accuracy
            .filter(|a| a.is_finite())
            .map(|a| a.clamp(0.0, 1.0));
        if result.game_type != self.id.game_type() {
            log::debug!(
                "{}: reported game type {:?}, using {}",
                self.id,
                result.game_type,
                self.id.game_type()
            );
            result.game_type = self.id.game_type().to_string();
        }
        result
    }

    fn teardown(&mut self, what: &str) -> String {
        self.running = false;
        self.callback = None;
        format!(
            r#"<script>window.fraudAcademy && window.fraudAcademy.unmount('{}', '{}');</script>"#,
            self.id.game_type(),
            what
        )
    }
}

/// Frame-loop arcade game: objects fall, the player catches the scams.
pub struct ArcadeGame {
    life: Lifecycle,
    duration_secs: u32,
    spawn_every_ms: u32,
}

impl MiniGame for ArcadeGame {
    fn id(&self) -> GameId {
        self.life.id
    }

    fn start(&mut self) -> String {
        self.life.running = true;
        format!(
            r#"<canvas id="minigame" class="w-full rounded-lg bg-slate-900" data-game="{}" data-loop="frame" data-duration="{}" data-spawn-ms="{}"></canvas>"#,
            self.life.id.game_type(),
            self.duration_secs,
            self.spawn_every_ms
        )
    }

    fn on_complete(&mut self, callback: CompletionCallback) {
        self.life.callback = Some(callback);
    }

    fn report(&mut self, result: MiniGameResult) -> bool {
        self.life.deliver(result)
    }

    fn dispose(&mut self) -> String {
        self.life.teardown("frame")
    }

    fn is_running(&self) -> bool {
        self.life.running
    }
}

/// Timed multiple-choice round.
pub struct QuizGame {
    life: Lifecycle,
    questions: u32,
    seconds_per_question: u32,
}

impl MiniGame for QuizGame {
    fn id(&self) -> GameId {
        self.life.id
    }

    fn start(&mut self) -> String {
        self.life.running = true;
        format!(
            r#"<div id="minigame" class="w-full" data-game="{}" data-loop="timer" data-questions="{}" data-seconds="{}"></div>"#,
            self.life.id.game_type(),
            self.questions,
            self.seconds_per_question
        )
    }

    fn on_complete(&mut self, callback: CompletionCallback) {
        self.life.callback = Some(callback);
    }

    fn report(&mut self, result: MiniGameResult) -> bool {
        self.life.deliver(result)
    }

    fn dispose(&mut self) -> String {
        self.life.teardown("timer")
    }

    fn is_running(&self) -> bool {
        self.life.running
    }
}

/// Drag items into "safe" and "scam" bins.
pub struct SortingGame {
    life: Lifecycle,
    items: u32,
    bins: &'static [&'static str],
}

impl MiniGame for SortingGame {
    fn id(&self) -> GameId {
        self.life.id
    }

    fn start(&mut self) -> String {
        self.life.running = true;
        format!(
            r#"<div id="minigame" class="w-full" data-game="{}" data-loop="drag" data-items="{}" data-bins="{}"></div>"#,
            self.life.id.game_type(),
            self.items,
            self.bins.join(",")
        )
    }

    fn on_complete(&mut self, callback: CompletionCallback) {
        self.life.callback = Some(callback);
    }

    fn report(&mut self, result: MiniGameResult) -> bool {
        self.life.deliver(result)
    }

    fn dispose(&mut self) -> String {
        self.life.teardown("drag")
    }

    fn is_running(&self) -> bool {
        self.life.running
    }
}

pub mod registry {
    use super::*;

    /// Build the mini-game module for an island.
    pub fn create(game: GameId) -> Box<dyn MiniGame> {
        let life = Lifecycle::new(game);
        match game {
            GameId::Island1 => Box::new(ArcadeGame {
                life,
                duration_secs: 60,
                spawn_every_ms: 900,
            }),
            GameId::Island2 => Box::new(SortingGame {
                life,
                items: 8,
                bins: &["strong", "weak"],
            }),
            GameId::Island3 => Box::new(ArcadeGame {
                life,
                duration_secs: 75,
                spawn_every_ms: 700,
            }),
            GameId::Island4 => Box::new(QuizGame {
                life,
                questions: 6,
                seconds_per_question: 15,
            }),
            GameId::Island5 => Box::new(SortingGame {
                life,
                items: 10,
                bins: &["safe", "scam"],
            }),
            GameId::Island6 => Box::new(QuizGame {
                life,
                questions: 8,
                seconds_per_question: 12,
            }),
        }
    }
}
