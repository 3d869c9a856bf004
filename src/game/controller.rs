//! Progression controller — the session state machine.
//!
//! ```text
//! Intro ──start──▶ Selecting ──select──▶ Playing ──┬──▶ Reviewing ────┐
//!                     ▲                            └──▶ BadgeAwarded ─┤
//!                     └──────────────── dismiss ──────────────────────┤
//!                                                                     ▼
//!                              GameOver ◀── wrong_answer        Completed
//! ```
//!
//! The controller is pure: no storage, no rendering. Every operation checks
//! its preconditions before touching the session, so an `Err` always leaves
//! the session untouched.

use crate::config::GameConfig;
use crate::error::ProgressError;
use crate::game::levels::{self, BadgeDefinition, MAX_LEVEL};
use crate::game::minigame::{GameId, MiniGameResult};
use crate::game::session::{Activity, Phase, Session};

pub const MAX_NAME_LEN: usize = 24;

/// How a scenario level was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelOutcome {
    pub correct: bool,
    /// Seconds-left style bonus. Anything above the level's
    /// `fast_answer_bonus` is cut to that value.
    pub time_bonus: u32,
    pub perfect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReport {
    pub level: u32,
    pub points: i32,
    /// The level had already been completed, nothing changed.
    pub replayed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerReport {
    Correct(LevelReport),
    Wrong { lives_left: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiniGameReport {
    pub points: u32,
    /// Present only the first time an island's game completes.
    pub badge: Option<&'static BadgeDefinition>,
}

pub struct Controller {
    config: GameConfig,
    session: Session,
}

impl Controller {
    pub fn new(config: GameConfig) -> Self {
        let session = Session::new(config.max_lives);
        Self { config, session }
    }

    /// Resume from a previously saved session.
    pub fn with_session(config: GameConfig, session: Session) -> Self {
        Self { config, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // ── Session lifecycle ──────────────────────────────────────────

    pub fn start(&mut self, name: &str) -> Result<(), ProgressError> {
        if self.session.has_started() {
            return Err(ProgressError::AlreadyStarted);
        }
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(ProgressError::InvalidName { max: MAX_NAME_LEN });
        }
        self.session.dog_name = name.to_string();
        self.session.phase = Phase::Selecting;
        log::info!("adventure started for {}", name);
        Ok(())
    }

    /// Back to a fresh session. Finished-run history survives.
    pub fn reset(&mut self) {
        if self.session.has_started()
            && !matches!(self.session.phase, Phase::GameOver | Phase::Completed)
            && self.session.score > 0
        {
            self.record_run();
        }
        let history = std::mem::take(&mut self.session.history);
        self.session = Session::new(self.config.max_lives);
        self.session.history = history;
        log::info!("session reset");
    }

    // ── Selection ──────────────────────────────────────────────────

    pub fn select_level(&mut self, level: u32) -> Result<(), ProgressError> {
        self.ensure_selecting()?;
        levels::level(level).ok_or(ProgressError::InvalidLevel(level))?;
        if !self.session.is_level_unlocked(level) {
            return Err(ProgressError::LevelLocked {
                level,
                current: self.session.current_level,
            });
        }
        self.session.phase = Phase::Playing {
            activity: Activity::Scenario { level, mistakes: 0 },
        };
        log::debug!("playing level {}", level);
        Ok(())
    }

    pub fn select_game(&mut self, game: GameId) -> Result<(), ProgressError> {
        self.ensure_selecting()?;
        if !self.session.is_game_unlocked(game) {
            return Err(ProgressError::GameLocked(game));
        }
        self.session.phase = Phase::Playing {
            activity: Activity::MiniGame { game },
        };
        log::debug!("playing {}", game);
        Ok(())
    }

    /// Leave whatever is being played without scoring it.
    pub fn exit_to_selection(&mut self) -> Result<(), ProgressError> {
        match self.session.phase {
            Phase::Playing { .. } => {
                self.session.phase = Phase::Selecting;
                Ok(())
            }
            _ => Err(ProgressError::NotPlaying),
        }
    }

    /// Acknowledge a review or badge screen.
    pub fn dismiss(&mut self) -> Result<(), ProgressError> {
        match self.session.phase {
            Phase::Reviewing { .. } | Phase::BadgeAwarded { .. } => {
                self.settle();
                Ok(())
            }
            _ => Err(ProgressError::NotPlaying),
        }
    }

    // ── Scoring ────────────────────────────────────────────────────

    pub fn complete_level(
        &mut self,
        level: u32,
        outcome: LevelOutcome,
    ) -> Result<LevelReport, ProgressError> {
        self.ensure_active()?;
        let def = levels::level(level).ok_or(ProgressError::InvalidLevel(level))?;
        if level > self.session.current_level {
            return Err(ProgressError::LevelLocked {
                level,
                current: self.session.current_level,
            });
        }

        let replayed = self.session.completed_levels.contains(&level);
        let points = if replayed {
            log::debug!("level {} already completed, not scored again", level);
            0
        } else {
            let rules = def.rules;
            let mut delta = if outcome.correct { rules.correct } else { rules.wrong };
            delta += outcome.time_bonus.min(rules.fast_answer_bonus) as i32;
            if outcome.perfect {
                delta += rules.perfect as i32;
            }
            self.session.score = apply_delta(self.session.score, delta);
            self.session.completed_levels.insert(level);
            self.advance_past(level);
            delta
        };

        match self.session.phase {
            Phase::Playing {
                activity: Activity::Scenario { level: playing, .. },
            } if playing == level => {
                self.session.phase = Phase::Reviewing {
                    level,
                    points,
                    correct: outcome.correct,
                };
            }
            // No review screen to dismiss, so finish the run here.
            Phase::Selecting if self.session.all_done() => self.settle(),
            _ => {}
        }

        Ok(LevelReport {
            level,
            points,
            replayed,
        })
    }

    /// Lose a life and take the wrong-answer penalty. Returns lives left.
    pub fn wrong_answer(&mut self) -> Result<u32, ProgressError> {
        self.ensure_active()?;
        let s = &mut self.session;
        s.lives = s.lives.saturating_sub(1);
        s.score = s.score.saturating_sub(self.config.wrong_answer_penalty);
        if let Phase::Playing {
            activity: Activity::Scenario { mistakes, .. },
        } = &mut s.phase
        {
            *mistakes += 1;
        }
        let lives = s.lives;
        if lives == 0 {
            s.phase = Phase::GameOver;
            log::info!("game over for {} with {} points", s.dog_name, s.score);
            self.record_run();
        }
        Ok(lives)
    }

    /// Judge a scenario choice and route it to `complete_level` or
    /// `wrong_answer`. A level counts as perfect when no wrong choice was
    /// picked first.
    pub fn answer_scenario(
        &mut self,
        level: u32,
        choice: usize,
        time_bonus: u32,
    ) -> Result<AnswerReport, ProgressError> {
        self.ensure_active()?;
        let mistakes = match self.session.phase {
            Phase::Playing {
                activity: Activity::Scenario { level: playing, mistakes },
            } if playing == level => mistakes,
            _ => return Err(ProgressError::NotPlaying),
        };
        let def = levels::level(level).ok_or(ProgressError::InvalidLevel(level))?;
        let correct = def
            .is_correct(choice)
            .ok_or(ProgressError::InvalidChoice { level, choice })?;

        if correct {
            let outcome = LevelOutcome {
                correct: true,
                time_bonus,
                perfect: mistakes == 0,
            };
            self.complete_level(level, outcome).map(AnswerReport::Correct)
        } else {
            let lives_left = self.wrong_answer()?;
            Ok(AnswerReport::Wrong { lives_left })
        }
    }

    /// Consume a mini-game result. Progression moves past the island
    /// whether or not the game was passed.
    pub fn complete_mini_game(
        &mut self,
        game: GameId,
        result: &MiniGameResult,
    ) -> Result<MiniGameReport, ProgressError> {
        self.ensure_active()?;
        if !self.session.is_game_unlocked(game) {
            return Err(ProgressError::GameLocked(game));
        }
        let island = levels::island(game);

        let mut points = if result.score.is_finite() {
            result.score.max(0.0).round() as u32
        } else {
            0
        };
        if result.passed {
            if let Some(last) = levels::level(island.last_level()) {
                points = points.saturating_add(last.rules.completion);
            }
        }

        let was_playing = matches!(
            self.session.phase,
            Phase::Playing { activity: Activity::MiniGame { game: g } } if g == game
        );
        let was_selecting = self.session.phase == Phase::Selecting;

        self.session.score = self.session.score.saturating_add(points);
        self.advance_past(island.last_level());
        let badge = if self.session.earned_badges.insert(game) {
            log::info!("badge earned: {}", island.badge.name);
            Some(&island.badge)
        } else {
            None
        };

        if was_playing || was_selecting {
            match badge {
                Some(_) => self.session.phase = Phase::BadgeAwarded { game },
                None => self.settle(),
            }
        }

        Ok(MiniGameReport { points, badge })
    }

    // ── Internals ──────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<(), ProgressError> {
        match self.session.phase {
            Phase::Intro => Err(ProgressError::NotStarted),
            Phase::GameOver | Phase::Completed => Err(ProgressError::SessionOver),
            _ => Ok(()),
        }
    }

    fn ensure_selecting(&self) -> Result<(), ProgressError> {
        self.ensure_active()?;
        match self.session.phase {
            Phase::Selecting => Ok(()),
            _ => Err(ProgressError::Busy),
        }
    }

    fn advance_past(&mut self, level: u32) {
        let next = self.session.current_level.max(level + 1).min(MAX_LEVEL);
        self.session.current_level = next;
    }

    /// Leave a transient screen: back to selection, or finish the run.
    fn settle(&mut self) {
        if self.session.all_done() {
            self.session.phase = Phase::Completed;
            log::info!("{} completed the academy", self.session.dog_name);
            self.record_run();
        } else {
            self.session.phase = Phase::Selecting;
        }
    }

    fn record_run(&mut self) {
        if self.session.dog_name.is_empty() {
            return;
        }
        let record = self.session.run_record();
        let history = &mut self.session.history;
        history.push(record);
        history.sort_by(|a, b| b.score.cmp(&a.score));
        history.truncate(self.config.history_size);
    }
}

/// Add a signed delta, flooring the score at zero.
fn apply_delta(score: u32, delta: i32) -> u32 {
    (i64::from(score) + i64::from(delta)).clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> Controller {
        let mut c = Controller::new(GameConfig::default());
        c.start("Rex").unwrap();
        c
    }

    fn correct() -> LevelOutcome {
        LevelOutcome {
            correct: true,
            ..Default::default()
        }
    }

    fn mini_result(passed: bool, score: f64) -> MiniGameResult {
        MiniGameResult {
            passed,
            score,
            game_type: "scam-scanner".to_string(),
            accuracy: None,
        }
    }

    #[test]
    fn rex_perfect_first_level() {
        let mut c = started();
        let report = c
            .complete_level(1, LevelOutcome { correct: true, time_bonus: 2, perfect: true })
            .unwrap();
        assert_eq!(report.points, 27);
        let s = c.session();
        assert_eq!(s.score, 27);
        assert_eq!(s.current_level, 2);
        assert_eq!(s.completed_levels.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn correct_sequence_never_loses_score() {
        let mut c = started();
        let mut last = 0;
        for level in 1..=MAX_LEVEL {
            c.complete_level(level, correct()).unwrap();
            let s = c.session();
            assert!(s.score >= last);
            assert_eq!(s.completed_levels.len(), level as usize);
            last = s.score;
        }
        assert_eq!(c.session().current_level, MAX_LEVEL);
    }

    #[test]
    fn completing_a_level_twice_is_idempotent() {
        let mut c = started();
        c.complete_level(1, correct()).unwrap();
        let before = c.session().clone();
        let report = c.complete_level(1, correct()).unwrap();
        assert!(report.replayed);
        assert_eq!(report.points, 0);
        assert_eq!(c.session(), &before);
    }

    #[test]
    fn wrong_outcome_floors_at_zero() {
        let mut c = started();
        c.complete_level(1, LevelOutcome::default()).unwrap();
        assert_eq!(c.session().score, 0);
        assert!(c.session().completed_levels.contains(&1));
    }

    #[test]
    fn time_bonus_is_capped() {
        let mut c = started();
        c.complete_level(1, LevelOutcome { correct: true, time_bonus: 99, perfect: false })
            .unwrap();
        assert_eq!(c.session().score, 15);
    }

    #[test]
    fn invalid_and_locked_levels_leave_state_alone() {
        let mut c = started();
        let before = c.session().clone();
        assert_eq!(c.complete_level(0, correct()), Err(ProgressError::InvalidLevel(0)));
        assert_eq!(c.complete_level(11, correct()), Err(ProgressError::InvalidLevel(11)));
        assert_eq!(
            c.complete_level(5, correct()),
            Err(ProgressError::LevelLocked { level: 5, current: 1 })
        );
        assert_eq!(c.session(), &before);
    }

    #[test]
    fn three_wrong_answers_end_the_game() {
        let mut c = started();
        assert_eq!(c.wrong_answer(), Ok(2));
        assert_eq!(c.wrong_answer(), Ok(1));
        assert_eq!(c.wrong_answer(), Ok(0));
        assert_eq!(c.session().lives, 0);
        assert_eq!(c.session().phase, Phase::GameOver);

        let before = c.session().clone();
        assert_eq!(c.wrong_answer(), Err(ProgressError::SessionOver));
        assert_eq!(c.complete_level(1, correct()), Err(ProgressError::SessionOver));
        assert_eq!(c.session(), &before);
    }

    #[test]
    fn wrong_answer_penalty_floors_at_zero() {
        let mut c = started();
        c.complete_level(1, LevelOutcome { correct: true, time_bonus: 0, perfect: false })
            .unwrap();
        c.wrong_answer().unwrap();
        assert_eq!(c.session().score, 5);
        c.wrong_answer().unwrap();
        assert_eq!(c.session().score, 0);
    }

    #[test]
    fn mini_game_badge_awarded_once() {
        let mut c = started();
        let first = c.complete_mini_game(GameId::Island1, &mini_result(true, 300.0)).unwrap();
        assert_eq!(first.badge.map(|b| b.island), Some(GameId::Island1));
        assert_eq!(first.points, 350);
        assert_eq!(c.session().phase, Phase::BadgeAwarded { game: GameId::Island1 });

        c.dismiss().unwrap();
        let second = c.complete_mini_game(GameId::Island1, &mini_result(true, 300.0)).unwrap();
        assert!(second.badge.is_none());
        assert_eq!(c.session().earned_badges.len(), 1);
        assert_eq!(c.session().phase, Phase::Selecting);
    }

    #[test]
    fn failed_mini_game_still_advances() {
        let mut c = started();
        let report = c.complete_mini_game(GameId::Island1, &mini_result(false, 40.0)).unwrap();
        assert_eq!(report.points, 40);
        assert_eq!(c.session().current_level, 3);
        assert_eq!(c.session().current_island(), GameId::Island2);
    }

    #[test]
    fn locked_mini_game_rejected() {
        let mut c = started();
        assert_eq!(
            c.complete_mini_game(GameId::Island4, &mini_result(true, 1.0)),
            Err(ProgressError::GameLocked(GameId::Island4))
        );
        assert_eq!(c.select_game(GameId::Island2), Err(ProgressError::GameLocked(GameId::Island2)));
    }

    #[test]
    fn reset_restores_initial_values_and_keeps_history() {
        let mut c = started();
        c.complete_level(1, correct()).unwrap();
        c.complete_mini_game(GameId::Island1, &mini_result(true, 10.0)).unwrap();
        c.wrong_answer().unwrap();
        c.reset();

        let s = c.session();
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, 3);
        assert_eq!(s.current_level, 1);
        assert!(s.completed_levels.is_empty());
        assert!(s.earned_badges.is_empty());
        assert_eq!(s.phase, Phase::Intro);
        assert_eq!(s.history.len(), 1);
        assert_eq!(s.history[0].name, "Rex");
    }

    #[test]
    fn reset_after_game_over_records_run_once() {
        let mut c = started();
        for _ in 0..3 {
            c.wrong_answer().unwrap();
        }
        c.reset();
        assert_eq!(c.session().history.len(), 1);
    }

    #[test]
    fn start_validates_name_and_runs_once() {
        let mut c = Controller::new(GameConfig::default());
        assert_eq!(c.start("   "), Err(ProgressError::InvalidName { max: MAX_NAME_LEN }));
        assert_eq!(c.start(&"x".repeat(30)), Err(ProgressError::InvalidName { max: MAX_NAME_LEN }));
        c.start("  Rex ").unwrap();
        assert_eq!(c.session().dog_name, "Rex");
        assert_eq!(c.start("Fido"), Err(ProgressError::AlreadyStarted));
        assert_eq!(c.session().dog_name, "Rex");
    }

    #[test]
    fn operations_before_start_are_rejected() {
        let mut c = Controller::new(GameConfig::default());
        assert_eq!(c.wrong_answer(), Err(ProgressError::NotStarted));
        assert_eq!(c.select_level(1), Err(ProgressError::NotStarted));
    }

    #[test]
    fn scenario_flow_reviews_then_returns_to_selection() {
        let mut c = started();
        c.select_level(1).unwrap();
        assert_eq!(c.select_level(1), Err(ProgressError::Busy));

        assert_eq!(c.answer_scenario(1, 0, 0), Ok(AnswerReport::Wrong { lives_left: 2 }));
        let report = c.answer_scenario(1, 1, 3).unwrap();
        // not perfect after a mistake: 10 + 3
        assert_eq!(
            report,
            AnswerReport::Correct(LevelReport { level: 1, points: 13, replayed: false })
        );
        assert_eq!(
            c.session().phase,
            Phase::Reviewing { level: 1, points: 13, correct: true }
        );
        c.dismiss().unwrap();
        assert_eq!(c.session().phase, Phase::Selecting);
    }

    #[test]
    fn answer_outside_the_scenario_is_rejected() {
        let mut c = started();
        assert_eq!(c.answer_scenario(1, 1, 0), Err(ProgressError::NotPlaying));
        c.select_level(1).unwrap();
        assert_eq!(c.answer_scenario(2, 1, 0), Err(ProgressError::NotPlaying));
        assert_eq!(
            c.answer_scenario(1, 9, 0),
            Err(ProgressError::InvalidChoice { level: 1, choice: 9 })
        );
    }

    #[test]
    fn exit_returns_to_selection_without_scoring() {
        let mut c = started();
        c.complete_level(1, correct()).unwrap();
        c.select_game(GameId::Island1).unwrap();
        let score = c.session().score;
        c.exit_to_selection().unwrap();
        assert_eq!(c.session().phase, Phase::Selecting);
        assert_eq!(c.session().score, score);
        assert_eq!(c.exit_to_selection(), Err(ProgressError::NotPlaying));
    }

    #[test]
    fn full_run_reaches_completed() {
        let mut c = started();
        for island in &levels::ISLANDS {
            for &level in island.levels {
                c.complete_level(level, correct()).unwrap();
            }
            c.select_game(island.id).unwrap();
            let report = c.complete_mini_game(island.id, &mini_result(true, 100.0)).unwrap();
            assert!(report.badge.is_some());
            c.dismiss().unwrap();
        }
        assert_eq!(c.session().phase, Phase::Completed);
        assert_eq!(c.session().history.len(), 1);
        assert_eq!(c.complete_level(1, correct()), Err(ProgressError::SessionOver));
    }

    #[test]
    fn badges_first_then_levels_reaches_completed() {
        let mut c = started();
        for game in GameId::ALL {
            c.select_game(game).unwrap();
            c.complete_mini_game(game, &mini_result(false, 0.0)).unwrap();
            c.dismiss().unwrap();
        }
        assert_eq!(c.session().phase, Phase::Selecting);

        for level in 1..MAX_LEVEL {
            c.complete_level(level, correct()).unwrap();
            assert_eq!(c.session().phase, Phase::Selecting);
        }
        c.complete_level(MAX_LEVEL, correct()).unwrap();
        assert!(c.session().all_done());
        assert_eq!(c.session().phase, Phase::Completed);
        assert_eq!(c.session().history.len(), 1);
    }
}
