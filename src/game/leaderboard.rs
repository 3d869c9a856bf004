//! Leaderboard: a fixed cast of rival pups, the player's earlier runs and
//! the live score of the current run.

use crate::game::session::{Phase, Session};

/// Rival entries shown on every leaderboard.
pub static RIVALS: [(&str, u32); 5] = [
    ("Sherlock Bones", 1450),
    ("Agent Biscuit", 1120),
    ("Captain Woof", 860),
    ("Detective Paws", 540),
    ("Scout", 210),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    /// The current run.
    pub is_player: bool,
}

/// Ranked standings. Ties share a rank; the live run sorts ahead of equal
/// scores so the player sees themself first.
pub fn standings(session: &Session) -> Vec<Standing> {
    let mut rows: Vec<(String, u32, bool)> = RIVALS
        .iter()
        .map(|&(name, score)| (name.to_string(), score, false))
        .collect();
    let mut history: Vec<(String, u32, bool)> = session
        .history
        .iter()
        .map(|r| (r.name.clone(), r.score, false))
        .collect();
    if session.has_started() {
        // A finished run is already in history; highlight that entry
        // instead of listing the run twice.
        let finished = matches!(session.phase, Phase::GameOver | Phase::Completed);
        let recorded = finished
            .then(|| {
                history
                    .iter()
                    .position(|(name, score, _)| *name == session.dog_name && *score == session.score)
            })
            .flatten();
        match recorded {
            Some(i) => history[i].2 = true,
            None => history.push((session.dog_name.clone(), session.score, true)),
        }
    }
    rows.extend(history);
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));

    let mut out: Vec<Standing> = Vec::with_capacity(rows.len());
    for (i, (name, score, is_player)) in rows.into_iter().enumerate() {
        let rank = match out.last() {
            Some(prev) if prev.score == score => prev.rank,
            _ => i + 1,
        };
        out.push(Standing {
            rank,
            name,
            score,
            is_player,
        });
    }
    out
}

/// Rank of the live run, if one is in progress.
pub fn player_rank(session: &Session) -> Option<usize> {
    standings(session).into_iter().find(|s| s.is_player).map(|s| s.rank)
}
