//! Player session: everything one play-through needs to resume.
//!
//! The whole struct is what gets written to localStorage, so every field
//! derives Serialize/Deserialize. Mutation goes through
//! [`crate::game::controller::Controller`]; this module only holds the data
//! and the read-only derivations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::game::levels::{self, MAX_LEVEL};
use crate::game::minigame::GameId;

/// What the player is doing right now. Drives which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Selecting,
    Playing { activity: Activity },
    Reviewing { level: u32, points: i32, correct: bool },
    BadgeAwarded { game: GameId },
    Completed,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activity {
    /// A quiz scenario; `mistakes` counts wrong picks so far.
    Scenario { level: u32, mistakes: u32 },
    MiniGame { game: GameId },
}

/// A finished (or abandoned) run kept for the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub name: String,
    pub score: u32,
    pub badges: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub dog_name: String,
    pub current_level: u32,
    pub score: u32,
    pub lives: u32,
    pub completed_levels: BTreeSet<u32>,
    pub earned_badges: BTreeSet<GameId>,
    pub phase: Phase,
    #[serde(default)]
    pub history: Vec<RunRecord>,
}

impl Session {
    pub fn new(max_lives: u32) -> Self {
        Self {
            dog_name: String::new(),
            current_level: 1,
            score: 0,
            lives: max_lives,
            completed_levels: BTreeSet::new(),
            earned_badges: BTreeSet::new(),
            phase: Phase::Intro,
            history: Vec::new(),
        }
    }

    /// Island the current level belongs to.
    pub fn current_island(&self) -> GameId {
        levels::island_for_level(self.current_level).unwrap_or(GameId::Island1)
    }

    pub fn is_level_unlocked(&self, level: u32) -> bool {
        (1..=self.current_level).contains(&level)
    }

    pub fn is_game_unlocked(&self, game: GameId) -> bool {
        levels::island(game).first_level() <= self.current_level
    }

    /// Every level completed and every island's badge earned.
    pub fn all_done(&self) -> bool {
        self.completed_levels.len() == MAX_LEVEL as usize
            && self.earned_badges.len() == GameId::ALL.len()
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Intro
    }

    pub fn run_record(&self) -> RunRecord {
        RunRecord {
            name: self.dog_name.clone(),
            score: self.score,
            badges: self.earned_badges.len(),
        }
    }

    /// Structural sanity check for data coming back from storage.
    pub fn validate(&self, max_lives: u32) -> Result<(), String> {
        if !(1..=MAX_LEVEL).contains(&self.current_level) {
            return Err(format!("current_level {} out of range", self.current_level));
        }
        if self.lives > max_lives {
            return Err(format!("lives {} above maximum {}", self.lives, max_lives));
        }
        if let Some(bad) = self.completed_levels.iter().find(|l| !(1..=MAX_LEVEL).contains(*l)) {
            return Err(format!("completed level {} out of range", bad));
        }
        if self.has_started() && self.dog_name.trim().is_empty() {
            return Err("started session without a name".to_string());
        }
        if self.lives == 0 && !self.is_over() {
            return Err("no lives left but not game over".to_string());
        }
        match self.phase {
            Phase::Playing {
                activity: Activity::Scenario { level, .. },
            }
            | Phase::Reviewing { level, .. }
                if levels::level(level).is_none() =>
            {
                Err(format!("phase refers to unknown level {}", level))
            }
            _ => Ok(()),
        }
    }
}
