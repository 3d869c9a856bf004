//! Game core: static tables, the session model, the progression controller,
//! mini-game modules, persistence and the leaderboard.
//!
//! State lives in WASM memory (`state`, thread_local) for the lifetime of the
//! page; `persist` moves it in and out of localStorage.

pub mod controller;
pub mod leaderboard;
pub mod levels;
pub mod minigame;
pub mod persist;
pub mod session;
pub mod state;
